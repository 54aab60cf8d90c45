//! Validate-and-retry loop around a [`ModelClient`].
//!
//! Each reply is extracted, parsed and schema-validated. A failing reply is
//! kept in the conversation and followed by a correction turn naming every
//! violation, so the model can fix just those fragments.

use archgraph_core::{Error, Result};
use archgraph_schema::{parse_any, AnalysisEnvelope, LoadError};
use archgraph_scan::RepoSnapshot;
use tracing::{info, warn};

use crate::extract::extract_json;
use crate::prompt;
use crate::providers::ModelClient;
use crate::types::ChatMessage;

pub struct Analyzer<C> {
    client: C,
    max_attempts: usize,
}

/// Why a single reply was rejected.
#[derive(Debug)]
enum Rejection {
    NoJson,
    Load(LoadError),
}

impl Rejection {
    fn correction(&self) -> String {
        match self {
            Rejection::NoJson => prompt::correction_for_parse_error("no JSON object found"),
            Rejection::Load(LoadError::Parse(e)) => prompt::correction_for_parse_error(&e.to_string()),
            Rejection::Load(LoadError::Invalid(report)) => prompt::correction_for_violations(report),
        }
    }

    fn summary(&self) -> String {
        match self {
            Rejection::NoJson => "reply contained no JSON object".into(),
            Rejection::Load(e) => e.to_string(),
        }
    }
}

impl<C: ModelClient> Analyzer<C> {
    pub fn new(client: C, max_attempts: usize) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Analyze a scanned repository into a validated envelope.
    pub async fn run(&self, snapshot: &RepoSnapshot) -> Result<AnalysisEnvelope> {
        let mut messages = prompt::build_messages(snapshot);
        let mut last_rejection = String::new();

        for attempt in 1..=self.max_attempts {
            info!(
                "Analysis attempt {}/{} via {}",
                attempt,
                self.max_attempts,
                self.client.describe()
            );
            let reply = self.client.complete(&messages).await?;

            match interpret(&reply) {
                Ok(mut envelope) => {
                    stamp(&mut envelope, snapshot);
                    info!(
                        "Model produced a valid architecture on attempt {}",
                        attempt
                    );
                    return Ok(envelope);
                }
                Err(rejection) => {
                    warn!("Attempt {} rejected: {}", attempt, rejection.summary());
                    last_rejection = rejection.summary();
                    messages.push(ChatMessage::assistant(reply));
                    messages.push(ChatMessage::user(rejection.correction()));
                }
            }
        }

        Err(Error::Model(format!(
            "No valid architecture after {} attempt(s): {}",
            self.max_attempts, last_rejection
        )))
    }
}

fn interpret(reply: &str) -> std::result::Result<AnalysisEnvelope, Rejection> {
    let json = extract_json(reply).ok_or(Rejection::NoJson)?;
    parse_any(json).map_err(Rejection::Load)
}

/// Fill provenance the model left out.
fn stamp(envelope: &mut AnalysisEnvelope, snapshot: &RepoSnapshot) {
    let graph = &mut envelope.architecture;
    if graph.generated_at.is_none() {
        graph.generated_at = Some(chrono::Utc::now().to_rfc3339());
    }
    if graph.source_repository.is_none() {
        graph.source_repository = Some(snapshot.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct ScriptedClient {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedClient {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ModelClient for ScriptedClient {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Model("script exhausted".into()))
        }

        fn describe(&self) -> String {
            "scripted".into()
        }
    }

    fn snapshot() -> RepoSnapshot {
        RepoSnapshot {
            root: PathBuf::from("/tmp/demo"),
            name: "demo".into(),
            files: vec!["src/main.rs".into()],
            manifests: Vec::new(),
            configs: Vec::new(),
            languages: BTreeMap::new(),
            truncated: false,
        }
    }

    const VALID: &str = r#"```json
{
  "architecture": {
    "name": "Demo",
    "version": "0.1.0",
    "nodes": [{"id": "cli", "name": "CLI", "kind": "service"}],
    "connections": []
  },
  "summary": "A CLI.",
  "insights": [],
  "warnings": []
}
```"#;

    const INVALID: &str = r#"{
  "architecture": {
    "name": "Demo",
    "version": "0.1.0",
    "nodes": [{"id": "", "name": "CLI", "kind": "microservice"}],
    "connections": []
  },
  "summary": "A CLI.",
  "insights": [],
  "warnings": []
}"#;

    #[tokio::test]
    async fn test_first_reply_valid() {
        let analyzer = Analyzer::new(ScriptedClient::new(&[VALID]), 3);
        let envelope = analyzer.run(&snapshot()).await.unwrap();
        assert_eq!(envelope.architecture.name, "Demo");
        assert_eq!(envelope.architecture.source_repository.as_deref(), Some("demo"));
        assert!(envelope.architecture.generated_at.is_some());
    }

    #[tokio::test]
    async fn test_retries_with_violations() {
        let analyzer = Analyzer::new(ScriptedClient::new(&[INVALID, VALID]), 3);
        let envelope = analyzer.run(&snapshot()).await.unwrap();
        assert_eq!(envelope.summary, "A CLI.");

        let seen = analyzer.client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let second = &seen[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].role, "assistant");
        let correction = &second[3].content;
        assert!(correction.contains("architecture.nodes.0.id"));
        assert!(correction.contains("architecture.nodes.0.kind"));
    }

    #[tokio::test]
    async fn test_bare_graph_reply_is_wrapped() {
        let bare = r#"{"name": "Demo", "version": "1", "nodes": [{"id": "a", "name": "A", "kind": "module"}], "connections": []}"#;
        let analyzer = Analyzer::new(ScriptedClient::new(&[bare]), 1);
        let envelope = analyzer.run(&snapshot()).await.unwrap();
        assert_eq!(envelope.summary, "");
        assert_eq!(envelope.architecture.nodes.len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let analyzer = Analyzer::new(
            ScriptedClient::new(&["Sorry, I can't.", "{ not json }", INVALID]),
            3,
        );
        match analyzer.run(&snapshot()).await {
            Err(Error::Model(msg)) => {
                assert!(msg.contains("after 3 attempt(s)"));
                assert!(msg.contains("schema violation"));
            }
            other => panic!("expected model error, got {:?}", other),
        }
        let seen = analyzer.client.seen.lock().unwrap();
        assert!(seen[1][3].content.contains("no JSON object found"));
        assert!(seen[2][5].content.contains("could not be parsed"));
    }

    #[tokio::test]
    async fn test_client_error_propagates() {
        let analyzer = Analyzer::new(ScriptedClient::new(&[]), 2);
        assert!(matches!(
            analyzer.run(&snapshot()).await,
            Err(Error::Model(msg)) if msg == "script exhausted"
        ));
    }
}
