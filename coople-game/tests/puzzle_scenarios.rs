use coople_game::constants::MAX_GUESSES;
use coople_game::{
    Catalog, Completion, DailySession, DateKey, GuessError, GuessOutcome, MemoryStorage,
    PuzzleConfig, SessionError, SessionState, SessionStore, ShareGlyph, SolutionMap, SongEntry,
    StatsStore, evaluate, render_share, reveal_window, search, share_row,
};

fn day(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn alpha_beta() -> Catalog {
    Catalog::from_entries([SongEntry::new("1", "Alpha"), SongEntry::new("2", "Beta")])
}

fn decade_catalog() -> Catalog {
    Catalog::from_entries((0..10).map(|n| SongEntry::new(format!("id{n}"), format!("Song {n}"))))
}

#[test]
fn scenario_win_on_second_attempt() {
    let catalog = alpha_beta();
    let mut state = SessionState::new();
    for guess in ["Alpha", "Beta"] {
        state = evaluate(&state, guess, &catalog, "2").unwrap();
    }
    assert_eq!(state.completion, Completion::Win);
    assert_eq!(
        share_row(&state),
        [
            ShareGlyph::NotYet,
            ShareGlyph::Win,
            ShareGlyph::Filler,
            ShareGlyph::Filler,
            ShareGlyph::Filler,
            ShareGlyph::Filler,
        ]
    );
    let text = render_share(&PuzzleConfig::default(), day("20230704"), &state).unwrap();
    assert!(text.starts_with("coople 20230704 2/6\n\n"));
}

#[test]
fn scenario_six_wrong_guesses_lose() {
    let catalog = decade_catalog();
    let mut state = SessionState::new();
    for n in 0..MAX_GUESSES {
        state = evaluate(&state, &format!("Song {n}"), &catalog, "id9").unwrap();
    }
    assert_eq!(state.completion, Completion::Lose);
    assert_eq!(share_row(&state), [ShareGlyph::NotYet; MAX_GUESSES]);
    let text = render_share(&PuzzleConfig::default(), day("20230704"), &state).unwrap();
    assert!(text.contains(" X/6\n\n🟧🟧🟧🟧🟧🟧\n\n"));
}

#[test]
fn scenario_unknown_guess_is_rejected() {
    let state = SessionState::new();
    let result = evaluate(&state, "Gamma", &alpha_beta(), "2");
    assert!(matches!(result, Err(GuessError::NotFound { .. })));
    assert_eq!(state.guesses.len(), 0);
}

#[test]
fn scenario_search_respects_token_order() {
    let catalog = Catalog::from_entries([
        SongEntry::new("a", "Waterloo"),
        SongEntry::new("b", "Dancing Queen"),
    ]);
    let hits = search("da ni", &catalog, 5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name, "Dancing Queen");
    assert!(search("ni da", &catalog, 5).is_empty());
    assert!(search("", &catalog, 5).is_empty());
}

#[test]
fn search_never_exceeds_limit_and_only_returns_matches() {
    let catalog = decade_catalog();
    for limit in 0..12 {
        let hits = search("so 1", &catalog, limit);
        assert!(hits.len() <= limit);
        assert!(hits.iter().all(|s| s.display_name == "Song 1"));
    }
    assert_eq!(search("song", &catalog, 5).len(), 5);
}

#[test]
fn reveal_window_is_monotonic_and_full_when_done() {
    let cfg = PuzzleConfig::default();
    let mut last = 0;
    for n in 0..=MAX_GUESSES {
        let bound = reveal_window(&cfg.stages, n, Completion::InProgress).end_ms;
        assert!(bound >= last);
        last = bound;
        assert_eq!(
            reveal_window(&cfg.stages, n, Completion::Win).end_ms,
            cfg.stages.total_ms()
        );
    }
}

#[test]
fn session_completion_is_logged_exactly_once() {
    let catalog = decade_catalog();
    let mut solutions = SolutionMap::empty();
    let date = day("20230801");
    solutions.assign(date, "id3");
    let storage = MemoryStorage::new();
    let cfg = PuzzleConfig::default();

    let mut session = DailySession::open(date, &catalog, &solutions, &storage, &cfg).unwrap();
    for n in 0..3 {
        let outcome = session.submit_guess(&format!("Song {n}")).unwrap();
        assert!(matches!(outcome, GuessOutcome::Continue { .. }));
    }
    assert_eq!(
        StatsStore::new(&storage).load().unwrap().total,
        0,
        "no stats before completion"
    );
    assert_eq!(
        session.submit_guess("Song 3").unwrap(),
        GuessOutcome::Won { attempts: 4 }
    );

    let err = session.submit_guess("Song 4").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Guess(GuessError::AlreadyComplete { .. })
    ));

    let stats = StatsStore::new(&storage).load().unwrap();
    assert_eq!(stats.bucket(4), Some(1));
    assert_eq!(stats.total, 1);
    assert!(stats.is_consistent());

    let saved = SessionStore::new(&storage).load(date).unwrap();
    assert_eq!(saved.guesses.len(), 4);
    assert_eq!(saved.completion, Completion::Win);
}

#[test]
fn lifetime_stats_span_many_days() {
    let catalog = decade_catalog();
    let storage = MemoryStorage::new();
    let cfg = PuzzleConfig::default();
    let mut solutions = SolutionMap::empty();
    let mut date = day("20231229");
    let mut dates = Vec::new();
    for _ in 0..4 {
        solutions.assign(date, "id0");
        dates.push(date);
        date = date.succ().unwrap();
    }

    for (idx, date) in dates.iter().enumerate() {
        let mut session = DailySession::open(*date, &catalog, &solutions, &storage, &cfg).unwrap();
        if idx % 2 == 0 {
            session.submit_guess("Song 0").unwrap();
        } else {
            for n in 1..=MAX_GUESSES {
                session.submit_guess(&format!("Song {n}")).unwrap();
            }
            assert_eq!(session.completion(), Completion::Lose);
        }
    }

    let stats = StatsStore::new(&storage).load().unwrap();
    assert_eq!(stats.bucket(1), Some(2));
    assert_eq!(stats.lose, 2);
    assert_eq!(stats.total, 4);
    assert!(stats.is_consistent());
}

#[test]
fn duplicate_guesses_are_permitted_but_cost_attempts() {
    let catalog = alpha_beta();
    let state = evaluate(&SessionState::new(), "Alpha", &catalog, "2").unwrap();
    let state = evaluate(&state, "Alpha", &catalog, "2").unwrap();
    assert_eq!(state.guesses.as_slice(), ["Alpha", "Alpha"]);
    assert_eq!(state.completion, Completion::InProgress);
}
