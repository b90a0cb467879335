use super::*;
use crate::error::WorkspaceError;
use crate::kernel::conflict::ResolutionPhase;
use crate::kernel::services::adapters::MemoryRepository;
use serde_json::json;

fn uri() -> DocumentUri {
    DocumentUri::new("blog", "post", "1").unwrap()
}

/// Runs a guarded save while a simulated user answers the prompt with
/// `answer` as soon as it opens.
fn save_answering(
    repo: &MemoryRepository,
    snapshot: &DocumentSnapshot,
    answer: fn(&ConflictResolver) -> bool,
) -> (Result<SaveOutcome>, bool) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let resolver = ConflictResolver::new();
    let ui = resolver.clone();
    let mut phases = resolver.watch_phase();

    rt.block_on(async {
        let prompter = tokio::spawn(async move {
            if phases
                .wait_for(|p| *p == ResolutionPhase::AwaitingDecision)
                .await
                .is_err()
            {
                return false;
            }
            answer(&ui)
        });
        let outcome = save_document(repo, &resolver, &uri(), snapshot).await;
        let prompted = if !prompter.is_finished() {
            prompter.abort();
            false
        } else {
            prompter.await.unwrap_or(false)
        };
        (outcome, prompted)
    })
}

#[test]
fn test_fresh_copy_saves_without_prompt() {
    let repo = MemoryRepository::new();
    let loaded = repo.insert(uri(), json!({ "title": "Hello" }));

    let edited = DocumentSnapshot::new(loaded.revision, json!({ "title": "Hello again" }));
    let (outcome, prompted) = save_answering(&repo, &edited, ConflictResolver::choose_reload);

    assert_eq!(outcome.unwrap(), SaveOutcome::Saved { revision: 2 });
    assert!(!prompted);
    assert_eq!(repo.current(&uri()).unwrap().content["title"], "Hello again");
}

#[test]
fn test_stale_copy_reload_returns_remote_content() {
    let repo = MemoryRepository::new();
    let loaded = repo.insert(uri(), json!({ "title": "Hello" }));
    repo.write_remote(&uri(), json!({ "title": "Remote edit" })).unwrap();

    let edited = DocumentSnapshot::new(loaded.revision, json!({ "title": "Local edit" }));
    let (outcome, prompted) = save_answering(&repo, &edited, ConflictResolver::choose_reload);

    assert!(prompted);
    match outcome.unwrap() {
        SaveOutcome::Reloaded(fresh) => {
            assert_eq!(fresh.revision, 2);
            assert_eq!(fresh.content["title"], "Remote edit");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(repo.current(&uri()).unwrap().content["title"], "Remote edit");
}

#[test]
fn test_stale_copy_overwrite_forces_save() {
    let repo = MemoryRepository::new();
    let loaded = repo.insert(uri(), json!({ "title": "Hello" }));
    repo.write_remote(&uri(), json!({ "title": "Remote edit" })).unwrap();

    let edited = DocumentSnapshot::new(loaded.revision, json!({ "title": "Local edit" }));
    let (outcome, prompted) =
        save_answering(&repo, &edited, ConflictResolver::choose_save_overwrite);

    assert!(prompted);
    assert_eq!(outcome.unwrap(), SaveOutcome::Saved { revision: 3 });
    assert_eq!(repo.current(&uri()).unwrap().content["title"], "Local edit");
}

#[test]
fn test_dismissed_prompt_abandons_save() {
    let repo = MemoryRepository::new();
    let loaded = repo.insert(uri(), json!({ "title": "Hello" }));
    repo.write_remote(&uri(), json!({ "title": "Remote edit" })).unwrap();

    let edited = DocumentSnapshot::new(loaded.revision, json!({ "title": "Local edit" }));
    let (outcome, prompted) = save_answering(&repo, &edited, ConflictResolver::dismiss);

    assert!(prompted);
    assert_eq!(outcome.unwrap(), SaveOutcome::Abandoned);
    let current = repo.current(&uri()).unwrap();
    assert_eq!(current.revision, 2);
    assert_eq!(current.content["title"], "Remote edit");
}

#[test]
fn test_repository_errors_propagate() {
    let repo = MemoryRepository::new();
    let snapshot = DocumentSnapshot::new(1, json!({}));
    let (outcome, prompted) = save_answering(&repo, &snapshot, ConflictResolver::dismiss);

    assert!(matches!(outcome, Err(WorkspaceError::Repository(_))));
    assert!(!prompted);
}
