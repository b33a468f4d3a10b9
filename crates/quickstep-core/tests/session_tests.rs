//! End-to-end tests for the scoring session controller.
//!
//! These drive the full pipeline the way the UI does: select a category,
//! type keystrokes, receive store updates, submit, reopen, and read the
//! leaderboard and progress views.

use quickstep_core::error::Error;
use quickstep_core::model::{Actor, Category, Competition, Judge, Participant, Role, ScoringItem};
use quickstep_core::session::{ScoringSession, SubmitOutcome};
use quickstep_core::wire::{MemoryWriter, ScoreWriter, WriteBatch};

fn item(id: &str, label: &str, order: i32) -> ScoringItem {
    ScoringItem {
        id: id.into(),
        label: label.into(),
        order,
    }
}

fn competition() -> Competition {
    Competition {
        id: "comp1".into(),
        name: "City Open".into(),
        locked: false,
        categories: vec![
            Category {
                id: "cat1".into(),
                name: "Salsa Couple".into(),
                locked: false,
                order: 0,
                items: vec![item("tech", "Technique", 0), item("art", "Artistry", 1)],
            },
            Category {
                id: "cat2".into(),
                name: "Bachata SOLO".into(),
                locked: false,
                order: 1,
                items: vec![item("tech", "Technique", 0), item("tw", "Teamwork", 1)],
            },
        ],
    }
}

fn participants() -> Vec<Participant> {
    vec![
        Participant {
            id: "p1".into(),
            category_id: "cat1".into(),
            number: "12".into(),
            name: "Ana & Luis".into(),
            total_score: None,
        },
        Participant {
            id: "p2".into(),
            category_id: "cat1".into(),
            number: "7".into(),
            name: "Bea & Carlos".into(),
            total_score: None,
        },
        Participant {
            id: "q1".into(),
            category_id: "cat2".into(),
            number: "3".into(),
            name: "Dana".into(),
            total_score: None,
        },
    ]
}

fn judges() -> Vec<Judge> {
    vec![
        Judge::new("j@x.y", "comp1", "J"),
        Judge::new("k@x.y", "comp1", "K"),
    ]
}

fn judge_session() -> ScoringSession {
    ScoringSession::new(
        competition(),
        participants(),
        judges(),
        Actor::new("j@x.y", Role::Judge),
    )
}

fn fill_category(session: &mut ScoringSession) {
    // Keystrokes as typed: two digits auto-format to "d.d".
    session.edit("p1", "tech", "70").unwrap();
    session.edit("p1", "art", "65").unwrap();
    session.edit("p2", "tech", "88").unwrap();
    session.edit("p2", "art", "88").unwrap();
}

// =============================================================================
// Submission round trip
// =============================================================================

#[test]
fn submit_then_reconcile_is_idempotent() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    fill_category(&mut session);

    let outcome = session.submit(&mut writer, false).unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted { cells_written: 2 });

    // The feed echoes the committed batch back.
    let batch = writer.last().unwrap().clone();
    for doc in &batch.cells {
        session.on_store_update(doc);
    }

    // Leave and revisit: the draft reseeds from the store and must equal
    // what was submitted.
    session.select_category("cat2").unwrap();
    session.select_category("cat1").unwrap();

    let draft = session.draft().unwrap();
    assert_eq!(draft.get("p1", "tech"), Some("7.0"));
    assert_eq!(draft.get("p1", "art"), Some("6.5"));
    assert_eq!(draft.get("p2", "tech"), Some("8.8"));
    assert_eq!(draft.get("p2", "art"), Some("8.8"));
}

#[test]
fn batch_holds_all_cells_plus_judge_doc() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    fill_category(&mut session);
    session.submit(&mut writer, false).unwrap();

    let batch = writer.last().unwrap();
    assert_eq!(batch.doc_count(), 3); // 2 cells + 1 judge doc
    assert_eq!(batch.judge.doc_key(), "comp1_j@x.y");
    assert_eq!(batch.judge.submitted_categories["cat1"], true);

    let mut keys: Vec<String> = batch.cells.iter().map(|c| c.doc_key()).collect();
    keys.sort();
    assert_eq!(keys, vec!["cat1_p1_j@x.y", "cat1_p2_j@x.y"]);
}

#[test]
fn incomplete_submission_warns_then_proceeds_on_confirmation() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    session.edit("p1", "tech", "70").unwrap();
    session.edit("p1", "art", "65").unwrap();
    // p2 left unscored.

    match session.submit(&mut writer, false).unwrap() {
        SubmitOutcome::Incomplete { missing } => {
            assert_eq!(missing, vec!["Bea & Carlos".to_string()]);
        }
        other => panic!("expected incomplete warning, got {other:?}"),
    }
    // Declining dispatched nothing.
    assert!(writer.committed().is_empty());

    // Confirming proceeds; the unscored participant gets an empty cell.
    let outcome = session.submit(&mut writer, true).unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted { cells_written: 2 });
    let batch = writer.last().unwrap();
    let p2_cell = batch.cells.iter().find(|c| c.participant_id == "p2").unwrap();
    assert!(p2_cell.values.is_empty());
}

#[test]
fn failed_write_reverts_to_draft() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();
    writer.fail_next("store offline");

    session.select_category("cat1").unwrap();
    fill_category(&mut session);

    let err = session.submit(&mut writer, false).unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));

    // Not left in an ambiguous state: still editable, still submittable.
    assert!(!session.submission_state("cat1").is_submitted());
    session.edit("p1", "tech", "71").unwrap();
    session.submit(&mut writer, false).unwrap();
    assert!(session.submission_state("cat1").is_submitted());
}

// =============================================================================
// Lock gating
// =============================================================================

#[test]
fn submitted_category_blocks_further_edits() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    fill_category(&mut session);
    session.submit(&mut writer, false).unwrap();

    assert!(matches!(
        session.edit("p1", "tech", "99").unwrap_err(),
        Error::CategoryLocked { .. }
    ));
    assert!(matches!(
        session.submit(&mut writer, false).unwrap_err(),
        Error::CategoryLocked { .. }
    ));
}

#[test]
fn reopen_flips_flag_without_touching_scores() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    fill_category(&mut session);
    session.submit(&mut writer, false).unwrap();

    session.reopen(&mut writer, "cat1").unwrap();
    assert!(!session.submission_state("cat1").is_submitted());

    // The reopen batch carries the judge doc only.
    let batch = writer.last().unwrap();
    assert!(batch.cells.is_empty());
    assert_eq!(batch.judge.submitted_categories["cat1"], false);

    // Editing resumes from the last submitted values.
    assert_eq!(session.draft().unwrap().get("p1", "tech"), Some("7.0"));
    session.edit("p1", "tech", "72").unwrap();
}

#[test]
fn locked_category_blocks_judge() {
    let mut competition = competition();
    competition.category_mut("cat1").unwrap().locked = true;

    let mut session = ScoringSession::new(
        competition,
        participants(),
        judges(),
        Actor::new("j@x.y", Role::Judge),
    );
    session.select_category("cat1").unwrap();
    assert!(matches!(
        session.edit("p1", "tech", "70").unwrap_err(),
        Error::CategoryLocked { .. }
    ));
}

#[test]
fn locked_competition_blocks_judge() {
    let mut competition = competition();
    competition.lock();

    let mut session = ScoringSession::new(
        competition,
        participants(),
        judges(),
        Actor::new("j@x.y", Role::Judge),
    );
    session.select_category("cat1").unwrap();
    assert!(matches!(
        session.edit("p1", "tech", "70").unwrap_err(),
        Error::CompetitionLocked(_)
    ));
}

#[test]
fn admin_lock_commands_cascade_and_guard_unlock() {
    let mut session = ScoringSession::new(
        competition(),
        participants(),
        judges(),
        Actor::new("admin@x.y", Role::Admin),
    );

    session.lock_competition().unwrap();
    assert!(session.competition().locked);
    assert!(session.competition().categories.iter().all(|c| c.locked));

    // Category unlock refused while the competition is locked.
    assert!(matches!(
        session.set_category_locked("cat1", false).unwrap_err(),
        Error::CompetitionLocked(_)
    ));

    session.unlock_competition().unwrap();
    assert!(!session.competition().locked);
    // Categories stay locked until unlocked individually.
    assert!(session.competition().category("cat1").unwrap().locked);
    session.set_category_locked("cat1", false).unwrap();
    assert!(!session.competition().category("cat1").unwrap().locked);
}

#[test]
fn non_admin_cannot_change_locks_and_cannot_edit() {
    let mut session = ScoringSession::new(
        competition(),
        participants(),
        judges(),
        Actor::new("watcher@x.y", Role::Spectator),
    );
    assert!(matches!(
        session.lock_competition().unwrap_err(),
        Error::Forbidden(_)
    ));

    session.select_category("cat1").unwrap();
    assert!(matches!(
        session.edit("p1", "tech", "70").unwrap_err(),
        Error::ReadOnlyActor(_)
    ));
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn judge_sees_own_totals_without_tie_markers() {
    let mut session = judge_session();
    session.select_category("cat1").unwrap();
    session.edit("p1", "tech", "88").unwrap();
    session.edit("p2", "tech", "88").unwrap();

    let rows = session.leaderboard("cat1").unwrap();
    // Own view: totals are the judge's own sums, ties never marked.
    assert!(rows.iter().all(|row| !row.is_tied));
    let p1 = rows.iter().find(|r| r.participant.id == "p1").unwrap();
    assert_eq!(p1.aggregate.total, 8.8);
    assert_eq!(p1.aggregate.judge_count, 1);
}

#[test]
fn admin_sees_all_judge_average_with_tie_markers() {
    let mut judge_side = judge_session();
    let mut writer = MemoryWriter::new();
    judge_side.select_category("cat1").unwrap();
    judge_side.edit("p1", "tech", "88").unwrap();
    judge_side.edit("p2", "tech", "88").unwrap();
    judge_side.submit(&mut writer, true).unwrap();

    let mut admin = ScoringSession::new(
        competition(),
        participants(),
        judges(),
        Actor::new("admin@x.y", Role::Admin),
    );
    for doc in &writer.last().unwrap().cells {
        admin.on_store_update(doc);
    }

    let rows = admin.leaderboard("cat1").unwrap();
    let p1 = rows.iter().find(|r| r.participant.id == "p1").unwrap();
    // 8.8 from J, 0 from K: (8.8 + 0) / 2.
    assert_eq!(p1.aggregate.average, 4.4);
    assert_eq!(p1.aggregate.judge_count, 2);
    // Both participants tie on 4.40 and the admin view marks it.
    assert!(rows.iter().all(|row| row.is_tied));
}

#[test]
fn unknown_category_is_a_stale_reference_not_a_crash() {
    let session = judge_session();
    assert!(matches!(
        session.leaderboard("deleted-cat").unwrap_err(),
        Error::UnknownCategory(_)
    ));
}

#[test]
fn progress_matrix_tracks_submissions_and_counts() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat1").unwrap();
    fill_category(&mut session);
    session.submit(&mut writer, false).unwrap();
    let batch = writer.last().unwrap().clone();
    for doc in &batch.cells {
        session.on_store_update(doc);
    }

    let progress = session.progress();
    let j = progress.iter().find(|row| row.judge_email == "j@x.y").unwrap();
    let cat1 = &j.categories[0];
    assert!(cat1.submitted);
    assert_eq!(cat1.scored, 2);
    assert_eq!(cat1.participants, 2);

    let k = progress.iter().find(|row| row.judge_email == "k@x.y").unwrap();
    assert!(!k.categories[0].submitted);
    assert_eq!(k.categories[0].scored, 0);
}

// =============================================================================
// Input handling through the session
// =============================================================================

#[test]
fn rejected_keystrokes_leave_cell_untouched() {
    let mut session = judge_session();
    session.select_category("cat1").unwrap();

    session.edit("p1", "tech", "7").unwrap();
    // "49" is rejected outright: first char not in 5-9.
    assert_eq!(session.edit("p1", "tech", "49").unwrap(), None);
    assert_eq!(session.draft().unwrap().get("p1", "tech"), Some("7"));
}

#[test]
fn blur_autocompletes_single_digit() {
    let mut session = judge_session();
    session.select_category("cat1").unwrap();

    session.edit("p1", "tech", "6").unwrap();
    assert_eq!(session.blur("p1", "tech").unwrap(), Some("6.0".into()));
    assert_eq!(session.draft().unwrap().get("p1", "tech"), Some("6.0"));
}

#[test]
fn solo_category_submission_ignores_teamwork() {
    let mut session = judge_session();
    let mut writer = MemoryWriter::new();

    session.select_category("cat2").unwrap();
    session.edit("q1", "tech", "75").unwrap();
    // "tw" untouched: cat2 is a SOLO category, so no warning.
    let outcome = session.submit(&mut writer, false).unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted { cells_written: 1 });
}

// =============================================================================
// Writer contract
// =============================================================================

/// A writer that asserts the batch invariant: cells and the judge flag
/// always travel together.
struct AssertingWriter {
    seen: usize,
}

impl ScoreWriter for AssertingWriter {
    fn commit(&mut self, batch: &WriteBatch) -> quickstep_core::Result<()> {
        assert!(!batch.judge.email.is_empty());
        for cell in &batch.cells {
            assert_eq!(cell.judge_email, batch.judge.email);
        }
        self.seen += 1;
        Ok(())
    }
}

#[test]
fn every_cell_in_a_batch_belongs_to_the_submitting_judge() {
    let mut session = judge_session();
    let mut writer = AssertingWriter { seen: 0 };

    session.select_category("cat1").unwrap();
    fill_category(&mut session);
    session.submit(&mut writer, false).unwrap();
    assert_eq!(writer.seen, 1);
}
