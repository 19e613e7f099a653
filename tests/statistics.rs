//! Integration tests for player statistics and the leaderboard.

use chrono::NaiveDate;
use tennis_stats_web::{
    compute_player_stats, DateRange, Leaderboard, Player, PlayerType, StatsError, TennisMatch,
};
use tennis_stats_web::logic::MAX_TOP;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn player(name: &str) -> Player {
    Player::new(name, 30, PlayerType::Professional).unwrap()
}

fn game(a: &str, b: &str, score: &str, on: &str) -> TennisMatch {
    TennisMatch::new(a, b, score, date(on)).unwrap()
}

fn scenario_players() -> Vec<Player> {
    ["Peter", "Novak", "Miroslav", "Roger"]
        .into_iter()
        .map(player)
        .collect()
}

fn scenario_matches() -> Vec<TennisMatch> {
    vec![
        game("Peter", "Novak", "6:4,6:2,6:2", "2025-05-10"),
        game("Peter", "Miroslav", "7:6,6:0,6:0", "2025-04-13"),
        game("Miroslav", "Novak", "0:6,0:6,0:6", "2025-01-08"),
        game("Novak", "Roger", "6:7,6:7,6:7", "2025-05-05"),
    ]
}

#[test]
fn scenario_player_stats() {
    let matches = scenario_matches();

    let peter = compute_player_stats("Peter", &matches, DateRange::all()).unwrap();
    assert_eq!((peter.matches, peter.wins, peter.losses), (2, 2, 0));
    assert_eq!(peter.win_rate_percent, 100.0);

    let novak = compute_player_stats("Novak", &matches, DateRange::all()).unwrap();
    assert_eq!((novak.matches, novak.wins, novak.losses), (3, 1, 2));
    assert_eq!(novak.win_rate_percent, 33.3);
}

#[test]
fn scenario_leaderboard_order() {
    let board = Leaderboard::build(&scenario_players(), &scenario_matches());
    let names: Vec<&str> = board.rows().iter().map(|r| r.name.as_str()).collect();
    // Peter and Roger share 100%; Peter has played more.
    assert_eq!(names, vec!["Peter", "Roger", "Novak", "Miroslav"]);
    assert_eq!(board.rows()[2].win_rate_percent, 33.3);
}

#[test]
fn scenario_export_contains_novak_line() {
    let board = Leaderboard::build(&scenario_players(), &scenario_matches());
    let text = board.to_delimited_text();
    assert!(text.starts_with("Name;Matches;Wins;Losses;WinRate(%)\n"));
    assert!(text.lines().any(|l| l == "Novak;3;1;2;33.3"));
    assert!(text.lines().any(|l| l == "Miroslav;2;0;2;0.0"));
}

#[test]
fn names_match_case_insensitively() {
    let matches = scenario_matches();
    let upper = compute_player_stats("  NOVAK ", &matches, DateRange::all()).unwrap();
    let lower = compute_player_stats("novak", &matches, DateRange::all()).unwrap();
    assert_eq!(upper.wins, lower.wins);
    assert_eq!(upper.losses, lower.losses);
    assert_eq!(upper.name, "NOVAK");
}

#[test]
fn swapping_sides_and_scores_gives_same_stats() {
    let original = vec![
        game("Peter", "Novak", "6:4,3:6,6:2", "2025-05-10"),
        game("Roger", "Peter", "7:5,6:4", "2025-05-11"),
    ];
    let swapped = vec![
        game("Novak", "Peter", "4:6,6:3,2:6", "2025-05-10"),
        game("Peter", "Roger", "5:7,4:6", "2025-05-11"),
    ];
    for name in ["Peter", "Novak", "Roger"] {
        assert_eq!(
            compute_player_stats(name, &original, DateRange::all()).unwrap(),
            compute_player_stats(name, &swapped, DateRange::all()).unwrap(),
        );
    }
}

#[test]
fn date_bounds_are_inclusive() {
    let matches = scenario_matches();
    let range = DateRange::new(Some(date("2025-04-13")), Some(date("2025-05-10")));
    let peter = compute_player_stats("Peter", &matches, range).unwrap();
    assert_eq!(peter.matches, 2);

    let only_may = DateRange::new(Some(date("2025-05-01")), None);
    let novak = compute_player_stats("Novak", &matches, only_may).unwrap();
    assert_eq!((novak.wins, novak.losses), (0, 2));
}

#[test]
fn blank_name_is_invalid_argument() {
    assert!(matches!(
        compute_player_stats("   ", &scenario_matches(), DateRange::all()),
        Err(StatsError::InvalidArgument(_))
    ));
}

#[test]
fn undetermined_and_invalid_matches_are_skipped() {
    let mut matches = scenario_matches();
    matches.push(game("Peter", "Roger", "6:4,4:6", "2025-06-01"));
    let mut broken = game("Peter", "Roger", "6:4", "2025-06-02");
    broken.score = "6:5,6:5".to_string();
    matches.push(broken);

    let peter = compute_player_stats("Peter", &matches, DateRange::all()).unwrap();
    assert_eq!((peter.matches, peter.wins, peter.losses), (2, 2, 0));
}

#[test]
fn player_without_matches_has_zero_rate() {
    let stats = compute_player_stats("Carlos", &scenario_matches(), DateRange::all()).unwrap();
    assert_eq!((stats.matches, stats.wins, stats.losses), (0, 0, 0));
    assert_eq!(stats.win_rate_percent, 0.0);
}

#[test]
fn players_without_matches_are_left_off_the_board() {
    let mut players = scenario_players();
    players.push(player("Carlos"));
    let board = Leaderboard::build(&players, &scenario_matches());
    assert_eq!(board.len(), 4);
    assert!(board.rows().iter().all(|r| r.name != "Carlos"));
}

#[test]
fn top_clamps_its_argument() {
    let mut players = scenario_players();
    players.push(player("Carlos"));
    let mut matches = scenario_matches();
    matches.push(game("Carlos", "Miroslav", "6:1,6:1", "2025-03-01"));
    let board = Leaderboard::build(&players, &matches);
    assert_eq!(board.len(), 5);

    assert_eq!(board.top(2), &board.rows()[..2]);
    assert_eq!(board.top(0), &board.rows()[..1]);
    assert_eq!(board.top(1000).len(), 5);
}

#[test]
fn without_winless_drops_players_with_only_losses() {
    let board = Leaderboard::build(&scenario_players(), &scenario_matches());
    let filtered = board.without_winless();
    assert_eq!(filtered.len(), 3);
    assert!(filtered.rows().iter().all(|r| r.wins > 0));
}

#[test]
fn players_differing_only_in_case_share_one_row() {
    let players = vec![player("Peter"), player("peter"), player("Novak")];
    let matches = vec![game("Peter", "Novak", "6:4,6:2", "2025-05-10")];
    let board = Leaderboard::build(&players, &matches);
    assert_eq!(board.len(), 2);
    assert_eq!(board.rows()[0].name, "Peter");
    assert_eq!(board.rows()[0].wins, 1);
}

#[test]
fn top_never_returns_more_than_one_hundred_rows() {
    let players: Vec<Player> = (0..150).map(|i| player(&format!("Player {i}"))).collect();
    let matches: Vec<TennisMatch> = (0..150)
        .map(|i| {
            let opponent = format!("Player {}", (i + 1) % 150);
            game(&format!("Player {i}"), &opponent, "6:4", "2025-05-10")
        })
        .collect();
    let board = Leaderboard::build(&players, &matches);
    assert_eq!(board.len(), 150);
    assert_eq!(board.top(1000).len(), MAX_TOP);
    assert_eq!(board.top(1000), board.top(100));
}
