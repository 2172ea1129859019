use anyhow::anyhow;
use nexus_terminal::sports::{
    MatchPhase, ScoreMatch, ScoreSource, select_display_matches,
};

struct FakeSource {
    scoreboard: Result<Vec<ScoreMatch>, String>,
    standings: Result<Vec<String>, String>,
    schedules: Vec<(String, Result<Vec<ScoreMatch>, String>)>,
}

impl FakeSource {
    fn new(scoreboard: Vec<ScoreMatch>) -> Self {
        Self {
            scoreboard: Ok(scoreboard),
            standings: Ok(Vec::new()),
            schedules: Vec::new(),
        }
    }
}

impl ScoreSource for FakeSource {
    fn scoreboard(&self) -> anyhow::Result<Vec<ScoreMatch>> {
        self.scoreboard.clone().map_err(|e| anyhow!(e))
    }

    fn standings_top(&self, count: usize) -> anyhow::Result<Vec<String>> {
        self.standings
            .clone()
            .map(|teams| teams.into_iter().take(count).collect())
            .map_err(|e| anyhow!(e))
    }

    fn team_schedule(&self, team_id: &str) -> anyhow::Result<Vec<ScoreMatch>> {
        for (id, schedule) in &self.schedules {
            if id == team_id {
                return schedule.clone().map_err(|e| anyhow!(e));
            }
        }
        Err(anyhow!("unknown team {team_id}"))
    }
}

fn m(id: &str, phase: MatchPhase, kickoff_ms: i64) -> ScoreMatch {
    ScoreMatch {
        id: id.to_string(),
        home: "HOM".to_string(),
        away: "AWY".to_string(),
        home_score: "0".to_string(),
        away_score: "0".to_string(),
        phase,
        clock: "00:00".to_string(),
        kickoff_ms,
    }
}

#[test]
fn live_match_takes_slot_one_then_soonest_upcoming() {
    let source = FakeSource::new(vec![
        m("up-late", MatchPhase::Upcoming, 4_000),
        m("live", MatchPhase::Live, 1_000),
        m("up-soon", MatchPhase::Upcoming, 2_000),
        m("up-mid", MatchPhase::Upcoming, 3_000),
    ]);

    let ids: Vec<String> = select_display_matches(&source)
        .matches
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["live", "up-soon", "up-mid"]);
}

#[test]
fn freshest_live_match_wins_when_several_are_on() {
    let source = FakeSource::new(vec![
        m("live-early", MatchPhase::Live, 1_000),
        m("live-late", MatchPhase::Live, 5_000),
    ]);

    let picked = select_display_matches(&source).matches;
    assert_eq!(picked[0].id, "live-late");
}

#[test]
fn top_team_result_is_featured_when_nothing_is_live() {
    let mut source = FakeSource::new(vec![
        m("up-1", MatchPhase::Upcoming, 2_000),
        m("up-2", MatchPhase::Upcoming, 3_000),
        m("board-ft", MatchPhase::Ft, 500),
    ]);
    source.standings = Ok(vec!["364".to_string(), "359".to_string()]);
    source.schedules = vec![(
        "364".to_string(),
        Ok(vec![
            m("lfc-old", MatchPhase::Ft, 100),
            m("lfc-latest", MatchPhase::Ft, 900),
            m("lfc-next", MatchPhase::Upcoming, 9_000),
        ]),
    )];

    let ids: Vec<String> = select_display_matches(&source)
        .matches
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["lfc-latest", "up-1", "up-2"]);
}

#[test]
fn second_ranked_team_supplies_featured_when_leader_has_no_result() {
    let mut source = FakeSource::new(vec![m("up-1", MatchPhase::Upcoming, 2_000)]);
    source.standings = Ok(vec!["364".to_string(), "359".to_string()]);
    source.schedules = vec![
        (
            "364".to_string(),
            Ok(vec![m("lfc-next", MatchPhase::Upcoming, 9_000)]),
        ),
        (
            "359".to_string(),
            Ok(vec![m("ars-latest", MatchPhase::Ft, 800)]),
        ),
    ];

    let picked = select_display_matches(&source).matches;
    assert_eq!(picked[0].id, "ars-latest");
}

#[test]
fn standings_failure_degrades_to_generic_result() {
    let mut source = FakeSource::new(vec![
        m("ft-old", MatchPhase::Ft, 100),
        m("ft-new", MatchPhase::Ft, 900),
        m("up-1", MatchPhase::Upcoming, 2_000),
    ]);
    source.standings = Err("standings down".to_string());

    let selection = select_display_matches(&source);
    let ids: Vec<&str> = selection.matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["ft-new", "up-1", "ft-old"]);
    assert!(!selection.warnings.is_empty());
}

#[test]
fn schedule_failure_degrades_to_generic_result() {
    let mut source = FakeSource::new(vec![
        m("ft-new", MatchPhase::Ft, 900),
        m("up-1", MatchPhase::Upcoming, 2_000),
    ]);
    source.standings = Ok(vec!["364".to_string()]);
    source.schedules = vec![("364".to_string(), Err("schedule down".to_string()))];

    let picked = select_display_matches(&source).matches;
    assert_eq!(picked[0].id, "ft-new");
}

#[test]
fn finished_matches_backfill_when_upcoming_runs_short() {
    let mut source = FakeSource::new(vec![
        m("ft-1", MatchPhase::Ft, 900),
        m("ft-2", MatchPhase::Ft, 700),
        m("ft-3", MatchPhase::Ft, 500),
    ]);
    source.standings = Err("standings down".to_string());

    let ids: Vec<String> = select_display_matches(&source)
        .matches
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["ft-1", "ft-2", "ft-3"]);
}

#[test]
fn featured_match_is_not_repeated_from_the_board() {
    // The featured result also appears in the scoreboard window; it must not
    // occupy two slots.
    let mut source = FakeSource::new(vec![
        m("shared-ft", MatchPhase::Ft, 900),
        m("up-1", MatchPhase::Upcoming, 2_000),
    ]);
    source.standings = Ok(vec!["364".to_string()]);
    source.schedules = vec![(
        "364".to_string(),
        Ok(vec![m("shared-ft", MatchPhase::Ft, 900)]),
    )];

    let ids: Vec<String> = select_display_matches(&source)
        .matches
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["shared-ft", "up-1"]);
}

#[test]
fn dead_scoreboard_yields_empty_selection() {
    let mut source = FakeSource::new(Vec::new());
    source.scoreboard = Err("connection refused".to_string());

    let selection = select_display_matches(&source);
    assert!(selection.matches.is_empty());
    assert!(!selection.warnings.is_empty());
}

#[test]
fn empty_scoreboard_yields_empty_selection_without_warnings_noise() {
    let source = FakeSource::new(Vec::new());
    let selection = select_display_matches(&source);
    assert!(selection.matches.is_empty());
}

#[test]
fn output_is_capped_at_three() {
    let source = FakeSource::new(vec![
        m("live", MatchPhase::Live, 1_000),
        m("up-1", MatchPhase::Upcoming, 2_000),
        m("up-2", MatchPhase::Upcoming, 3_000),
        m("up-3", MatchPhase::Upcoming, 4_000),
        m("up-4", MatchPhase::Upcoming, 5_000),
    ]);
    assert_eq!(select_display_matches(&source).matches.len(), 3);
}
