//! Integration tests for score validation and match outcome resolution.

use rstest::rstest;
use tennis_stats_web::logic::{validate_score_with, ScoreGrammar};
use tennis_stats_web::{resolve_outcome, validate_score, MatchOutcome, ScoreError, Side};

#[rstest]
#[case("6:4", Side::A)]
#[case("7:5", Side::A)]
#[case("7:6", Side::A)]
#[case("6:0", Side::A)]
#[case("5:7", Side::B)]
#[case("6:7", Side::B)]
#[case("0:6", Side::B)]
fn finished_sets_are_accepted(#[case] raw: &str, #[case] winner: Side) {
    let sets = validate_score(raw).unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].winner, winner);
}

#[rstest]
#[case("6:5")]
#[case("8:6")]
#[case("4:2")]
#[case("7:3")]
#[case("5:5")]
fn unfinished_sets_are_rejected(#[case] raw: &str) {
    assert!(matches!(
        validate_score(raw),
        Err(ScoreError::InvalidSet { .. }) | Err(ScoreError::Tie { .. })
    ));
}

#[test]
fn level_set_is_a_tie_error() {
    assert!(matches!(validate_score("6:6"), Err(ScoreError::Tie { games: 6 })));
}

#[rstest]
#[case("6-4")]
#[case("6:")]
#[case(":4")]
#[case("a:b")]
#[case("")]
#[case("6:4,,6:3")]
#[case("10:8")]
fn malformed_tokens_are_rejected(#[case] raw: &str) {
    assert!(matches!(
        validate_score(raw),
        Err(ScoreError::MalformedSet(_))
    ));
}

#[test]
fn whitespace_around_sets_is_ignored() {
    let sets = validate_score(" 6:4 ,  3:6, 7:5 ").unwrap();
    let games: Vec<(u32, u32)> = sets.iter().map(|s| (s.games_a, s.games_b)).collect();
    assert_eq!(games, vec![(6, 4), (3, 6), (7, 5)]);
}

#[test]
fn one_bad_set_rejects_the_whole_score() {
    assert!(validate_score("6:4, 6:5, 6:3").is_err());
}

#[test]
fn lenient_grammar_reads_two_digit_counts_but_keeps_set_rules() {
    assert_eq!(validate_score_with("06:04", ScoreGrammar::Lenient).unwrap().len(), 1);
    assert!(matches!(
        validate_score_with("10:8", ScoreGrammar::Lenient),
        Err(ScoreError::InvalidSet { games_a: 10, games_b: 8 })
    ));
}

#[rstest]
#[case("6:4,6:2,6:2", MatchOutcome::PlayerAWins)]
#[case("6:7,6:7,6:7", MatchOutcome::PlayerBWins)]
#[case("6:4,3:6,7:5", MatchOutcome::PlayerAWins)]
#[case("6:4,3:6", MatchOutcome::Undetermined)]
#[case("0:6,6:0,6:7", MatchOutcome::PlayerBWins)]
fn outcome_follows_set_count(#[case] raw: &str, #[case] expected: MatchOutcome) {
    let sets = validate_score(raw).unwrap();
    assert_eq!(resolve_outcome(&sets), expected);
}

#[test]
fn no_sets_is_undetermined() {
    assert_eq!(resolve_outcome(&[]), MatchOutcome::Undetermined);
    assert_eq!(MatchOutcome::Undetermined.winner(), None);
}
