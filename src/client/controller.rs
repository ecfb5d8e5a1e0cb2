use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use super::collaborators::{Clipboard, Notifier};
use super::error::{ClientError, GENERIC_FAILURE};
use super::service::TranslationService;
use super::state::{cap_chars, TranslationState, UiState, MAX_SOURCE_CHARS};
use crate::translate::TranslationRequest;

pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);
pub const COPIED_MESSAGE: &str = "Copied to clipboard!";

type Store = watch::Sender<UiState>;

/// Drives the two-panel translator view.
///
/// State lives in a watch channel: every operation applies its changes in a
/// single store update, so subscribers never observe a half-applied update.
/// Asynchronous work (translation settlement, copy feedback reset) holds only
/// a weak handle to the store; once the controller is dropped their results
/// are discarded.
///
/// `translate` and `copy_result` spawn onto the current Tokio runtime.
pub struct TranslatorController {
    store: Arc<Store>,
    service: Arc<dyn TranslationService>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    copy_generation: Arc<AtomicU64>,
    copy_reset: Mutex<Option<AbortHandle>>,
}

impl TranslatorController {
    pub fn new(
        service: Arc<dyn TranslationService>,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (store, _) = watch::channel(UiState::default());
        Self {
            store: Arc::new(store),
            service,
            clipboard,
            notifier,
            copy_generation: Arc::new(AtomicU64::new(0)),
            copy_reset: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> UiState {
        self.store.borrow().clone()
    }

    /// Replace the source text, keeping at most `MAX_SOURCE_CHARS` characters
    pub fn set_source_text(&self, text: &str) {
        let capped = cap_chars(text, MAX_SOURCE_CHARS);
        self.store.send_modify(|state| {
            state.source_text.clear();
            state.source_text.push_str(capped);
        });
    }

    pub fn set_source_lang(&self, code: &str) {
        self.store
            .send_modify(|state| state.source_lang = code.to_string());
    }

    pub fn set_target_lang(&self, code: &str) {
        self.store
            .send_modify(|state| state.target_lang = code.to_string());
    }

    /// Exchange languages and panel texts in one update.
    /// Ignored while a translation is pending; returns whether it applied.
    pub fn swap_languages(&self) -> bool {
        let mut swapped = false;
        self.store.send_if_modified(|state| {
            if state.is_translating() {
                return false;
            }
            std::mem::swap(&mut state.source_lang, &mut state.target_lang);
            let previous_source = std::mem::take(&mut state.source_text);
            state.source_text = state.translated_text().to_string();
            state.translation = if previous_source.is_empty() {
                TranslationState::Idle
            } else {
                TranslationState::Succeeded(previous_source)
            };
            state.copied = false;
            swapped = true;
            true
        });
        swapped
    }

    /// Start a translation of the current source text.
    ///
    /// Returns `None` without contacting the service when input is blank, the
    /// languages match, or an attempt is already pending. Otherwise returns the
    /// handle of the settling task.
    pub fn translate(&self) -> Option<JoinHandle<()>> {
        let mut checked = None;
        self.store.send_if_modified(|state| {
            if state.is_translating() {
                return false;
            }
            let result = preflight(state);
            let started = result.is_ok();
            if started {
                state.translation = TranslationState::Pending;
            }
            checked = Some(result);
            started
        });

        let request = match checked {
            None => {
                debug!("Translation already pending");
                return None;
            }
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                self.notifier.error(&e.user_message());
                return None;
            }
        };

        let settlement = Settlement {
            store: Arc::downgrade(&self.store),
            notifier: self.notifier.clone(),
            settled: false,
        };
        let service = self.service.clone();

        Some(tokio::spawn(async move {
            let result = service.translate(request).await;
            settlement.finish(result);
        }))
    }

    /// Copy the current translation and show the confirmation for
    /// `COPY_FEEDBACK`. A later copy restarts the confirmation.
    pub fn copy_result(&self) -> bool {
        let text = self.store.borrow().translated_text().to_string();
        if text.is_empty() {
            return false;
        }

        if let Err(e) = self.clipboard.write_text(&text) {
            warn!("Clipboard write failed: {:#}", e);
            self.notifier.error("Could not copy to clipboard");
            return false;
        }

        let generation = self.copy_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.send_modify(|state| state.copied = true);
        self.notifier.success(COPIED_MESSAGE);

        let store = Arc::downgrade(&self.store);
        let current = self.copy_generation.clone();
        let reset = tokio::spawn(async move {
            tokio::time::sleep(COPY_FEEDBACK).await;
            if let Some(store) = store.upgrade() {
                store.send_if_modified(|state| {
                    // a newer copy owns the flag
                    if current.load(Ordering::SeqCst) != generation || !state.copied {
                        return false;
                    }
                    state.copied = false;
                    true
                });
            }
        });

        let mut slot = self.copy_reset.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(reset.abort_handle()) {
            previous.abort();
        }
        true
    }
}

impl Drop for TranslatorController {
    fn drop(&mut self) {
        let slot = self.copy_reset.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(reset) = slot.take() {
            reset.abort();
        }
    }
}

fn preflight(state: &UiState) -> Result<TranslationRequest, ClientError> {
    if state.source_text.trim().is_empty() {
        return Err(ClientError::MissingInput);
    }
    if state.source_lang == state.target_lang {
        return Err(ClientError::SameLanguage);
    }
    Ok(TranslationRequest {
        text: state.source_text.clone(),
        source_lang: state.source_lang.clone(),
        target_lang: state.target_lang.clone(),
    })
}

/// Applies the outcome of one attempt. If the attempt is dropped without
/// finishing (the service panicked), the view is moved to `Failed` anyway so
/// it never stays pending.
struct Settlement {
    store: Weak<Store>,
    notifier: Arc<dyn Notifier>,
    settled: bool,
}

impl Settlement {
    fn finish(mut self, result: Result<String, ClientError>) {
        self.settled = true;
        match result {
            Ok(text) => {
                self.apply(TranslationState::Succeeded(text));
            }
            Err(e) => {
                let message = e.user_message();
                if self.apply(TranslationState::Failed(message.clone())) {
                    self.notifier.error(&message);
                }
            }
        }
    }

    fn apply(&self, outcome: TranslationState) -> bool {
        let Some(store) = self.store.upgrade() else {
            debug!("View closed before translation settled; discarding result");
            return false;
        };
        store.send_modify(|state| {
            if state.is_translating() {
                state.translation = outcome;
                state.copied = false;
            }
        });
        true
    }
}

impl Drop for Settlement {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if self.apply(TranslationState::Failed(GENERIC_FAILURE.to_string())) {
            self.notifier.error(GENERIC_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    enum Reply {
        Text(&'static str),
        Server(&'static str),
        Unexpected,
        Panic,
    }

    struct FakeService {
        reply: Reply,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
        last: Mutex<Option<TranslationRequest>>,
    }

    impl FakeService {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                gate: None,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                gate: Some(gate),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationService for FakeService {
        async fn translate(&self, request: TranslationRequest) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Server(message) => Err(ClientError::Server(message.to_string())),
                Reply::Unexpected => Err(ClientError::Unexpected("status 404".to_string())),
                Reply::Panic => panic!("service blew up"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        successes: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.successes.lock().unwrap().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("clipboard unavailable");
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Harness {
        controller: TranslatorController,
        service: Arc<FakeService>,
        clipboard: Arc<RecordingClipboard>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness_with(service: Arc<FakeService>, clipboard: RecordingClipboard) -> Harness {
        let clipboard = Arc::new(clipboard);
        let notifier = Arc::new(RecordingNotifier::default());
        let controller =
            TranslatorController::new(service.clone(), clipboard.clone(), notifier.clone());
        Harness {
            controller,
            service,
            clipboard,
            notifier,
        }
    }

    fn harness(reply: Reply) -> Harness {
        harness_with(FakeService::new(reply), RecordingClipboard::default())
    }

    async fn translated(h: &Harness, text: &str) {
        h.controller.set_source_text(text);
        h.controller.translate().unwrap().await.unwrap();
    }

    #[tokio::test]
    async fn successful_translation_settles_to_text() {
        let h = harness(Reply::Text("Hola mundo"));
        translated(&h, "Hello world").await;

        let state = h.controller.snapshot();
        assert_eq!(state.translation, TranslationState::Succeeded("Hola mundo".to_string()));
        assert!(!state.is_translating());
        let sent = h.service.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.source_lang, "en");
        assert_eq!(sent.target_lang, "es");
        assert_eq!(sent.text, "Hello world");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_service() {
        let h = harness(Reply::Text("unused"));
        h.controller.set_source_text("   ");

        assert!(h.controller.translate().is_none());
        assert_eq!(h.service.calls(), 0);
        assert_eq!(
            *h.notifier.errors.lock().unwrap(),
            vec!["Please enter text to translate".to_string()]
        );
        assert_eq!(h.controller.snapshot().translation, TranslationState::Idle);
    }

    #[tokio::test]
    async fn same_language_never_reaches_service() {
        let h = harness(Reply::Text("unused"));
        h.controller.set_source_text("Hello");
        h.controller.set_target_lang("en");

        assert!(h.controller.translate().is_none());
        assert_eq!(h.service.calls(), 0);
        assert_eq!(
            *h.notifier.errors.lock().unwrap(),
            vec!["Source and target languages must be different".to_string()]
        );
    }

    #[tokio::test]
    async fn server_error_is_shown_and_pending_cleared() {
        let h = harness(Reply::Server("Text too long. Maximum 5000 characters."));
        translated(&h, "Hello").await;

        let state = h.controller.snapshot();
        assert!(!state.is_translating());
        assert_eq!(
            state.error_message(),
            Some("Text too long. Maximum 5000 characters.")
        );
        assert_eq!(
            *h.notifier.errors.lock().unwrap(),
            vec!["Text too long. Maximum 5000 characters.".to_string()]
        );
    }

    #[tokio::test]
    async fn unexpected_failure_uses_generic_message() {
        let h = harness(Reply::Unexpected);
        translated(&h, "Hello").await;
        assert_eq!(h.controller.snapshot().error_message(), Some(GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn panicking_service_still_clears_pending() {
        let h = harness(Reply::Panic);
        h.controller.set_source_text("Hello");
        let result = h.controller.translate().unwrap().await;
        assert!(result.unwrap_err().is_panic());

        let state = h.controller.snapshot();
        assert!(!state.is_translating());
        assert_eq!(state.error_message(), Some(GENERIC_FAILURE));
        assert_eq!(*h.notifier.errors.lock().unwrap(), vec![GENERIC_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn only_one_attempt_in_flight() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeService::gated(Reply::Text("Hola"), gate.clone()),
            RecordingClipboard::default(),
        );
        h.controller.set_source_text("Hello");

        let first = h.controller.translate().unwrap();
        assert!(h.controller.snapshot().is_translating());
        assert!(h.controller.translate().is_none());

        gate.notify_one();
        first.await.unwrap();
        assert_eq!(h.service.calls(), 1);
        assert_eq!(h.controller.snapshot().translated_text(), "Hola");
    }

    #[tokio::test]
    async fn result_is_discarded_after_teardown() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeService::gated(Reply::Server("late failure"), gate.clone()),
            RecordingClipboard::default(),
        );
        h.controller.set_source_text("Hello");
        let view = h.controller.subscribe();
        let pending = h.controller.translate().unwrap();

        let Harness { controller, notifier, .. } = h;
        drop(controller);
        gate.notify_one();
        pending.await.unwrap();

        assert!(view.borrow().is_translating());
        assert!(notifier.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn swap_exchanges_all_four_values_at_once() {
        let h = harness(Reply::Text("Hola"));
        translated(&h, "Hello").await;
        let mut view = h.controller.subscribe();
        view.mark_unchanged();

        assert!(h.controller.swap_languages());
        assert!(view.has_changed().unwrap());
        let state = view.borrow_and_update().clone();
        assert_eq!(state.source_lang, "es");
        assert_eq!(state.target_lang, "en");
        assert_eq!(state.source_text, "Hola");
        assert_eq!(state.translated_text(), "Hello");
    }

    #[tokio::test]
    async fn swap_while_pending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeService::gated(Reply::Text("Hola"), gate.clone()),
            RecordingClipboard::default(),
        );
        h.controller.set_source_text("Hello");
        let pending = h.controller.translate().unwrap();
        let before = h.controller.snapshot();

        assert!(!h.controller.swap_languages());
        assert_eq!(h.controller.snapshot(), before);

        gate.notify_one();
        pending.await.unwrap();
        let state = h.controller.snapshot();
        assert_eq!(state.source_lang, "en");
        assert_eq!(state.target_lang, "es");
        assert_eq!(state.translated_text(), "Hola");
    }

    #[tokio::test(start_paused = true)]
    async fn swap_clears_copy_confirmation() {
        let h = harness(Reply::Text("Hola"));
        translated(&h, "Hello").await;
        assert!(h.controller.copy_result());
        assert!(h.controller.snapshot().copied);

        assert!(h.controller.swap_languages());
        assert!(!h.controller.snapshot().copied);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_triggers_start_one_attempt() {
        let gate = Arc::new(Notify::new());
        let Harness { controller, service, .. } = harness_with(
            FakeService::gated(Reply::Text("Hola"), gate.clone()),
            RecordingClipboard::default(),
        );
        controller.set_source_text("Hello");
        let controller = Arc::new(controller);
        let barrier = Arc::new(std::sync::Barrier::new(4));
        let runtime = tokio::runtime::Handle::current();

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let controller = controller.clone();
                let barrier = barrier.clone();
                let runtime = runtime.clone();
                std::thread::spawn(move || {
                    let _guard = runtime.enter();
                    barrier.wait();
                    controller.translate()
                })
            })
            .collect();
        let started: Vec<_> = threads
            .into_iter()
            .filter_map(|t| t.join().unwrap())
            .collect();
        assert_eq!(started.len(), 1);

        gate.notify_one();
        for handle in started {
            handle.await.unwrap();
        }
        assert_eq!(service.calls(), 1);
        assert_eq!(controller.snapshot().translated_text(), "Hola");
    }

    #[tokio::test]
    async fn chosen_source_language_is_sent() {
        let h = harness(Reply::Text("Hallo"));
        h.controller.set_source_lang("fr");
        h.controller.set_target_lang("de");
        translated(&h, "Bonjour").await;

        let sent = h.service.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.source_lang, "fr");
        assert_eq!(sent.target_lang, "de");
        assert_eq!(h.controller.snapshot().source_caption(), "🇫🇷 French");
    }

    #[tokio::test]
    async fn swap_twice_restores_values() {
        let h = harness(Reply::Text("Bonjour"));
        h.controller.set_target_lang("fr");
        translated(&h, "Hello").await;
        let before = h.controller.snapshot();

        h.controller.swap_languages();
        h.controller.swap_languages();
        let after = h.controller.snapshot();

        assert_eq!(after.source_lang, before.source_lang);
        assert_eq!(after.target_lang, before.target_lang);
        assert_eq!(after.source_text, before.source_text);
        assert_eq!(after.translated_text(), before.translated_text());
    }

    #[tokio::test]
    async fn swap_with_empty_panels_stays_idle() {
        let h = harness(Reply::Text("unused"));
        h.controller.swap_languages();
        let state = h.controller.snapshot();
        assert_eq!(state.source_lang, "es");
        assert_eq!(state.target_lang, "en");
        assert_eq!(state.translation, TranslationState::Idle);
    }

    #[test]
    fn source_text_is_capped() {
        let h = harness(Reply::Text("unused"));
        h.controller.set_source_text(&"x".repeat(MAX_SOURCE_CHARS + 10));
        let state = h.controller.snapshot();
        assert_eq!(state.source_text.chars().count(), MAX_SOURCE_CHARS);
        assert_eq!(state.char_counter(), "5000/5000");
    }

    #[test]
    fn copy_without_translation_is_noop() {
        let h = harness(Reply::Text("unused"));
        assert!(!h.controller.copy_result());
        assert!(h.clipboard.writes.lock().unwrap().is_empty());
        assert!(!h.controller.snapshot().copied);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_feedback_resets_after_delay() {
        let h = harness(Reply::Text("Hola"));
        translated(&h, "Hello").await;

        assert!(h.controller.copy_result());
        assert_eq!(*h.clipboard.writes.lock().unwrap(), vec!["Hola".to_string()]);
        assert_eq!(*h.notifier.successes.lock().unwrap(), vec![COPIED_MESSAGE.to_string()]);
        assert!(h.controller.snapshot().copied);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(h.controller.snapshot().copied);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!h.controller.snapshot().copied);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_copy_restarts_feedback_once() {
        let h = harness(Reply::Text("Hola"));
        translated(&h, "Hello").await;
        let mut view = h.controller.subscribe();

        h.controller.copy_result();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        h.controller.copy_result();
        view.mark_unchanged();

        // the first timer would have fired here
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(h.controller.snapshot().copied);
        assert!(!view.has_changed().unwrap());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!h.controller.snapshot().copied);
        assert!(view.has_changed().unwrap());
        view.mark_unchanged();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!view.has_changed().unwrap());
        assert!(!h.controller.snapshot().copied);
    }

    #[test]
    fn clipboard_failure_is_reported() {
        let h = harness_with(
            FakeService::new(Reply::Text("unused")),
            RecordingClipboard {
                fail: true,
                ..Default::default()
            },
        );
        h.controller.store.send_modify(|state| {
            state.translation = TranslationState::Succeeded("Hola".to_string())
        });

        assert!(!h.controller.copy_result());
        assert!(!h.controller.snapshot().copied);
        assert_eq!(h.notifier.errors.lock().unwrap().len(), 1);
    }
}
