use serde::Serialize;

use crate::gateway::{Gateway, GatewayReply, GenerationRequest};
use crate::gemini::ContentModel;

/// Outcome of one idea in a bulk run, kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkRecord {
    Success { idea: String, post: String },
    Error { idea: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub records: Vec<BulkRecord>,
    pub failures: usize,
}

impl BulkReport {
    pub fn successes(&self) -> usize {
        self.records.len() - self.failures
    }
}

/// Shared knobs applied to every idea in the batch.
#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub platform: String,
    pub tone: String,
    pub emotion_preset: Vec<String>,
    pub language: String,
}

/// Generate a post per idea, one upstream call at a time. Sequential on
/// purpose: it bounds upstream load and keeps results in input order. An
/// individual failure is recorded and the batch moves on.
pub async fn run<M: ContentModel>(
    gateway: &Gateway<M>,
    ideas: &[String],
    options: &BulkOptions,
) -> BulkReport {
    let mut records = Vec::with_capacity(ideas.len());
    let mut failures = 0;

    for idea in ideas {
        let request = GenerationRequest::Content {
            idea: idea.clone(),
            platform: options.platform.clone(),
            emotion_preset: options.emotion_preset.clone(),
            tone: options.tone.clone(),
            language: options.language.clone(),
            template: None,
        };

        match gateway.handle(request).await {
            Ok(GatewayReply::Text { text }) => {
                records.push(BulkRecord::Success { idea: idea.clone(), post: text });
            }
            Ok(other) => {
                log::error!("Unexpected reply shape for bulk content: {:?}", other);
                failures += 1;
                records.push(BulkRecord::Error {
                    idea: idea.clone(),
                    error: "Unexpected response shape.".to_string(),
                });
            }
            Err(e) => {
                failures += 1;
                records.push(BulkRecord::Error { idea: idea.clone(), error: e.to_string() });
            }
        }
    }

    BulkReport { records, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::testing::ScriptedModel;

    fn options() -> BulkOptions {
        BulkOptions {
            platform: "x".to_string(),
            tone: "Viral".to_string(),
            emotion_preset: vec!["curiosity".to_string()],
            language: "en".to_string(),
        }
    }

    fn ideas(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn partial_failure_preserves_order_and_counts() {
        let model = ScriptedModel::new(vec![
            ScriptedModel::reply("post one"),
            ScriptedModel::failure("Gemini API error (500): boom"),
            ScriptedModel::reply("post three"),
        ]);
        let gateway = Gateway::new(model);

        let report = run(&gateway, &ideas(&["a", "b", "c"]), &options()).await;

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.failures, 1);
        assert_eq!(report.successes(), 2);

        assert_eq!(
            report.records[0],
            BulkRecord::Success { idea: "a".to_string(), post: "post one".to_string() }
        );
        assert!(matches!(&report.records[1], BulkRecord::Error { idea, .. } if idea == "b"));
        assert_eq!(
            report.records[2],
            BulkRecord::Success { idea: "c".to_string(), post: "post three".to_string() }
        );
    }

    #[tokio::test]
    async fn all_failures_never_abort_the_batch() {
        let model = ScriptedModel::new(vec![
            ScriptedModel::failure("down"),
            ScriptedModel::failure("still down"),
        ]);
        let gateway = Gateway::new(model);

        let report = run(&gateway, &ideas(&["a", "b"]), &options()).await;
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures, 2);
    }

    #[tokio::test]
    async fn empty_batch_is_a_clean_report() {
        let model = ScriptedModel::new(Vec::new());
        let gateway = Gateway::new(model);

        let report = run(&gateway, &[], &options()).await;
        assert!(report.records.is_empty());
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn records_serialize_with_status_tags() {
        let success = serde_json::to_value(BulkRecord::Success {
            idea: "i".to_string(),
            post: "p".to_string(),
        })
        .unwrap();
        assert_eq!(success["status"], "success");

        let error = serde_json::to_value(BulkRecord::Error {
            idea: "i".to_string(),
            error: "e".to_string(),
        })
        .unwrap();
        assert_eq!(error["status"], "error");
    }
}
