use super::*;

fn uri() -> DocumentUri {
    DocumentUri::new("blog", "post", "1").unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

#[test]
fn test_request_opens_prompt() {
    let resolver = ConflictResolver::new();
    assert_eq!(resolver.phase(), ResolutionPhase::Idle);
    assert!(resolver.prompt().is_none());

    let _pending = resolver
        .request_resolution(ConflictPrompt::for_document(uri()))
        .unwrap();
    assert_eq!(resolver.phase(), ResolutionPhase::AwaitingDecision);
    let prompt = resolver.prompt().unwrap();
    assert_eq!(prompt.uri, uri());
    assert_eq!(prompt.message, CONFLICT_MESSAGE_KEY);
}

#[test]
fn test_second_request_fails_while_pending() {
    let resolver = ConflictResolver::new();
    let pending = resolver
        .request_resolution(ConflictPrompt::for_document(uri()))
        .unwrap();

    let err = resolver
        .request_resolution(ConflictPrompt::new(uri(), "again"))
        .err()
        .unwrap();
    assert!(matches!(err, WorkspaceError::ResolutionPending));

    drop(pending);
    assert_eq!(resolver.phase(), ResolutionPhase::Idle);
    assert!(resolver
        .request_resolution(ConflictPrompt::new(uri(), "again"))
        .is_ok());
}

#[test]
fn test_choice_resolves_and_returns_to_idle() {
    let rt = runtime();
    let resolver = ConflictResolver::new();

    let pending = resolver
        .request_resolution(ConflictPrompt::for_document(uri()))
        .unwrap();
    assert!(resolver.choose_reload());
    assert_eq!(resolver.phase(), ResolutionPhase::ReloadChosen);
    assert!(!resolver.choose_save_overwrite());

    let decision = rt.block_on(pending.wait());
    assert_eq!(decision, ConflictDecision::Reload);
    assert_eq!(resolver.phase(), ResolutionPhase::Idle);
    assert!(resolver.prompt().is_none());
}

#[test]
fn test_dismiss_resolves_to_dismissed() {
    let rt = runtime();
    let resolver = ConflictResolver::new();

    let pending = resolver
        .request_resolution(ConflictPrompt::for_document(uri()))
        .unwrap();
    let ui = resolver.clone();
    let mut phases = resolver.watch_phase();

    let decision = rt.block_on(async move {
        tokio::spawn(async move {
            phases
                .wait_for(|p| *p == ResolutionPhase::AwaitingDecision)
                .await
                .unwrap();
            ui.dismiss();
        });
        pending.wait().await
    });
    assert_eq!(decision, ConflictDecision::Dismissed);
    assert_eq!(resolver.phase(), ResolutionPhase::Idle);
}

#[test]
fn test_prompt_torn_down_without_choice_is_dismissed() {
    let rt = runtime();
    let resolver = ConflictResolver::new();
    let pending = resolver
        .request_resolution(ConflictPrompt::for_document(uri()))
        .unwrap();

    // The prompt side goes away and drops the reply channel.
    resolver.lock().reply = None;
    let decision = rt.block_on(pending.wait());
    assert_eq!(decision, ConflictDecision::Dismissed);
}

#[test]
fn test_decisions_without_prompt_are_ignored() {
    let resolver = ConflictResolver::new();
    assert!(!resolver.choose_reload());
    assert!(!resolver.choose_save_overwrite());
    assert!(!resolver.dismiss());
    assert_eq!(resolver.phase(), ResolutionPhase::Idle);
}
