//! Chat session: message list, busy state and the submit pipeline

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

use crate::chat::message::ChatMessage;
use crate::config::{transliteration_notice, GenerationParams, APOLOGY};
use crate::model::{InferenceBackend, ModelKind};

/// Whether a session has a call in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyState {
    Idle,
    Pending,
}

/// Shared view of a session's busy flag, for whoever renders the input box
#[derive(Debug, Clone, Default)]
pub struct BusyHandle(Arc<AtomicBool>);

impl BusyHandle {
    pub fn state(&self) -> BusyState {
        if self.0.load(Ordering::Acquire) {
            BusyState::Pending
        } else {
            BusyState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state() == BusyState::Pending
    }

    /// Idle -> Pending until the returned guard drops
    fn begin(&self) -> PendingGuard {
        self.0.store(true, Ordering::Release);
        PendingGuard(Arc::clone(&self.0))
    }
}

/// Pending -> Idle when dropped, however the call ends
struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What a call to [`ChatSession::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming; nothing appended, nothing sent
    Ignored,
    /// The model replied and its reply was appended
    Answered,
    /// The call failed and the apology was appended
    Failed,
}

/// One chat widget's worth of state, bound to a single model
pub struct ChatSession<B: InferenceBackend> {
    kind: ModelKind,
    backend: B,
    params: GenerationParams,
    messages: Vec<ChatMessage>,
    busy: BusyHandle,
}

impl<B: InferenceBackend> ChatSession<B> {
    /// Create a session seeded with the model's welcome message
    pub fn new(kind: ModelKind, backend: B) -> Self {
        Self {
            kind,
            backend,
            params: GenerationParams::default(),
            messages: vec![ChatMessage::bot(kind.welcome_message())],
            busy: BusyHandle::default(),
        }
    }

    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_handle(&self) -> BusyHandle {
        self.busy.clone()
    }

    /// Drop the transcript back to the welcome message
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::bot(self.kind.welcome_message()));
    }

    /// Send one user input to the model.
    ///
    /// Appends the user message straight away, then exactly one bot message once the call
    /// resolves: the normalized reply on success, the fixed apology on any failure. Generation
    /// prompts that were transliterated also get a system notice before the call.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        // `&mut self` keeps a second submit out until this one resolves or is dropped
        let _pending = self.busy.begin();
        debug!(model = %self.kind, "Call pending");

        self.messages.push(ChatMessage::user(text));

        let prepared = self.kind.build_request(text, self.params);
        if let Some(t) = prepared.transliteration.as_ref().filter(|t| t.changed()) {
            self.messages
                .push(ChatMessage::system(transliteration_notice(&t.original, &t.converted)));
        }

        let result = match self.backend.infer(&prepared.request).await {
            Ok(response) => self.kind.normalize(&response, text),
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                self.messages
                    .push(ChatMessage::bot(reply.text).with_entities(reply.entities));
                SubmitOutcome::Answered
            }
            Err(e) => {
                error!(
                    model = %self.kind,
                    endpoint = prepared.request.endpoint().path(),
                    error = %e,
                    "Inference call failed"
                );
                self.messages.push(ChatMessage::bot(APOLOGY));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Sender;
    use crate::error::{ClientError, Result};
    use crate::model::{
        GenerateResponse, HealthStatus, InferenceRequest, InferenceResponse, ModelInfo,
        NerResponse,
    };
    use crate::ner::RawEntity;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    type Reply = fn(&InferenceRequest) -> Result<InferenceResponse>;

    /// Backend that answers from a fixed function and records what it saw
    struct ScriptedBackend {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<InferenceRequest>>>,
        watch: Arc<Mutex<Option<BusyHandle>>>,
        saw_busy: Arc<AtomicBool>,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                requests: Arc::new(Mutex::new(Vec::new())),
                watch: Arc::new(Mutex::new(None)),
                saw_busy: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(handle) = self.watch.lock().unwrap().as_ref() {
                self.saw_busy.store(handle.is_busy(), Ordering::SeqCst);
            }
            (self.reply)(request)
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus::default())
        }

        async fn model_info(&self) -> Result<ModelInfo> {
            Ok(ModelInfo::default())
        }
    }

    /// Backend whose calls never finish
    struct HangingBackend;

    #[async_trait]
    impl InferenceBackend for HangingBackend {
        async fn infer(&self, _request: &InferenceRequest) -> Result<InferenceResponse> {
            std::future::pending().await
        }

        async fn health(&self) -> Result<HealthStatus> {
            std::future::pending().await
        }

        async fn model_info(&self) -> Result<ModelInfo> {
            std::future::pending().await
        }
    }

    fn generated(_: &InferenceRequest) -> Result<InferenceResponse> {
        Ok(InferenceResponse::Generate(GenerateResponse {
            response: Some("नेपाल सुन्दर देश हो।".to_string()),
            full_text: None,
        }))
    }

    fn server_error(_: &InferenceRequest) -> Result<InferenceResponse> {
        Err(ClientError::Status {
            status: 500,
            body: "{\"error\": \"Generation failed\"}".to_string(),
        })
    }

    fn person_entities(_: &InferenceRequest) -> Result<InferenceResponse> {
        let raw = |word: &str, entity: &str, confidence, start, end| RawEntity {
            word: word.to_string(),
            entity: entity.to_string(),
            confidence,
            start,
            end,
        };
        Ok(InferenceResponse::Ner(NerResponse {
            entities: vec![
                raw("राम", "B-PERSON", 0.9, 0, 3),
                raw("शर्मा", "I-PERSON", 0.8, 4, 9),
            ],
            entity_count: Some(2),
        }))
    }

    #[tokio::test]
    async fn test_new_session_has_welcome() {
        let session = ChatSession::new(ModelKind::Ner, ScriptedBackend::new(generated));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender(), Sender::Bot);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = ScriptedBackend::new(generated);
        let calls = Arc::clone(&backend.calls);
        let mut session = ChatSession::new(ModelKind::Generation, backend);

        assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(session.submit("  \n\t ").await, SubmitOutcome::Ignored);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reply_appends_user_then_bot() {
        let backend = ScriptedBackend::new(generated);
        let calls = Arc::clone(&backend.calls);
        let mut session = ChatSession::new(ModelKind::Generation, backend);

        let outcome = session.submit("नेपालको बारेमा भन्नुहोस्").await;
        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let msgs = session.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].sender(), Sender::User);
        assert_eq!(msgs[1].text(), "नेपालको बारेमा भन्नुहोस्");
        assert_eq!(msgs[2].sender(), Sender::Bot);
        assert_eq!(msgs[2].text(), "नेपाल सुन्दर देश हो।");
    }

    #[tokio::test]
    async fn test_transliteration_notice_precedes_call() {
        let backend = ScriptedBackend::new(generated);
        let requests = Arc::clone(&backend.requests);
        let mut session = ChatSession::new(ModelKind::Generation, backend);

        session.submit("Namaste Nepal").await;

        let msgs = session.messages();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[1].text(), "Namaste Nepal");
        assert_eq!(msgs[2].sender(), Sender::System);
        assert_eq!(
            msgs[2].text(),
            "✨ Auto-converted: \"Namaste Nepal\" → \"नमस्ते नेपाल\""
        );
        assert_eq!(msgs[3].sender(), Sender::Bot);

        let sent = requests.lock().unwrap();
        match &sent[0] {
            InferenceRequest::Generate(req) => assert_eq!(req.prompt, "नमस्ते नेपाल"),
            other => panic!("unexpected request: {:?}", other),
        };
    }

    #[tokio::test]
    async fn test_failure_appends_single_apology_and_clears_busy() {
        let backend = ScriptedBackend::new(server_error);
        let watch = Arc::clone(&backend.watch);
        let saw_busy = Arc::clone(&backend.saw_busy);
        let mut session = ChatSession::new(ModelKind::Generation, backend);
        *watch.lock().unwrap() = Some(session.busy_handle());

        let outcome = session.submit("के छ?").await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(saw_busy.load(Ordering::SeqCst));
        assert!(!session.is_busy());

        let msgs = session.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[2].sender(), Sender::Bot);
        assert_eq!(msgs[2].text(), APOLOGY);
        assert!(!msgs[2].text().contains("500"));
    }

    #[tokio::test]
    async fn test_busy_cleared_after_success() {
        let backend = ScriptedBackend::new(generated);
        let watch = Arc::clone(&backend.watch);
        let saw_busy = Arc::clone(&backend.saw_busy);
        let mut session = ChatSession::new(ModelKind::Generation, backend);
        *watch.lock().unwrap() = Some(session.busy_handle());

        session.submit("के छ?").await;
        assert!(saw_busy.load(Ordering::SeqCst));
        assert_eq!(session.busy_handle().state(), BusyState::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_call_returns_to_idle() {
        let mut session = ChatSession::new(ModelKind::Lemmatization, HangingBackend);
        let handle = session.busy_handle();

        let result =
            tokio::time::timeout(Duration::from_millis(20), session.submit("खेल्दै")).await;
        assert!(result.is_err());
        assert!(!handle.is_busy());
        // User message went in before the call; no bot reply ever arrived
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_handle_reports_pending_while_call_hangs() {
        let mut session = ChatSession::new(ModelKind::Generation, HangingBackend);
        let handle = session.busy_handle();
        assert_eq!(handle.state(), BusyState::Idle);

        {
            let call = session.submit("नमस्ते");
            tokio::pin!(call);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut call).await;
            assert!(polled.is_err());
            assert_eq!(handle.state(), BusyState::Pending);
        }

        assert_eq!(handle.state(), BusyState::Idle);
    }

    #[tokio::test]
    async fn test_ner_reply_carries_grouped_entities() {
        let mut session = ChatSession::new(ModelKind::Ner, ScriptedBackend::new(person_entities));

        session.submit("राम शर्मा काठमाडौं विश्वविद्यालयमा पढ्छन्।").await;

        let reply = session.last_message().unwrap();
        assert_eq!(reply.sender(), Sender::Bot);
        assert_eq!(reply.entities().len(), 1);
        assert_eq!(reply.entities()[0].word, "राम शर्मा");
        assert!(reply.text().contains("85.0%"));
    }

    #[tokio::test]
    async fn test_mismatched_reply_is_apology() {
        // Generation backend answering a NER session
        let mut session = ChatSession::new(ModelKind::Ner, ScriptedBackend::new(generated));
        assert_eq!(session.submit("राम").await, SubmitOutcome::Failed);
        assert_eq!(session.last_message().unwrap().text(), APOLOGY);
    }

    #[tokio::test]
    async fn test_reset_keeps_only_welcome() {
        let mut session = ChatSession::new(ModelKind::Aspect, ScriptedBackend::new(server_error));
        session.submit("केही").await;
        session.reset();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text(), ModelKind::Aspect.welcome_message());
    }
}
