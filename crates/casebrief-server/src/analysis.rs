//! Document analysis orchestration
//!
//! Runs both rule engines over a document's text and hands their output to
//! a [`RecordSink`]. Stored results are reused unless a reanalysis is asked
//! for.

use casebrief_classifiers::{RuleEngines, TextAnalysis};
use casebrief_core::{DocumentCategory, DocumentId, RecordSink, Result, RiskFlag, RiskSummary};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Stored analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub document_id: DocumentId,
    pub risks: Vec<RiskFlag>,
    pub category: DocumentCategory,
    pub summary: RiskSummary,
}

/// Detect, classify and persist
pub async fn analyze_document(
    sink: &dyn RecordSink,
    engines: &RuleEngines,
    document_id: DocumentId,
    text: &str,
    reanalyze: bool,
) -> Result<DocumentAnalysis> {
    let start = Instant::now();
    sink.register_document(document_id).await?;

    let mut risks = sink.list_risk_flags(document_id).await?;
    if risks.is_empty() || reanalyze {
        let drafts = engines.detect_risks(text);
        for draft in &drafts {
            metrics::counter!(
                "casebrief_risk_flags_total",
                "risk_type" => draft.risk_type.as_str(),
                "severity" => draft.severity.as_str()
            )
            .increment(1);
        }

        if !drafts.is_empty() {
            sink.create_risk_flags(document_id, drafts).await?;
            risks = sink.list_risk_flags(document_id).await?;
        }
    } else {
        debug!(document_id, count = risks.len(), "Reusing stored risk flags");
    }

    let category = match sink.get_category(document_id).await? {
        Some(stored) if !reanalyze => stored,
        _ => {
            sink.upsert_category(document_id, engines.classify(text))
                .await?
        }
    };

    let summary = RiskSummary::from_flags(&risks);
    let elapsed_us = start.elapsed().as_micros() as f64;
    metrics::counter!("casebrief_analyses_total", "mode" => "document").increment(1);
    metrics::histogram!("casebrief_analysis_latency_us", "mode" => "document").record(elapsed_us);

    info!(
        document_id,
        risks = summary.total,
        unresolved = summary.unresolved,
        category = %category.category,
        reanalyze,
        "Document analyzed"
    );

    Ok(DocumentAnalysis {
        document_id,
        risks,
        category,
        summary,
    })
}

/// Run both engines without touching any sink
pub fn preview(engines: &RuleEngines, text: &str) -> TextAnalysis {
    let start = Instant::now();
    let analysis = engines.analyze(text);

    metrics::counter!("casebrief_analyses_total", "mode" => "preview").increment(1);
    metrics::histogram!("casebrief_analysis_latency_us", "mode" => "preview")
        .record(start.elapsed().as_micros() as f64);

    analysis
}

/// Plain-text report of an analysis, using display labels
pub fn render_report(analysis: &DocumentAnalysis) -> String {
    let category = &analysis.category;
    let summary = &analysis.summary;

    let mut lines = vec![format!("Category: {}", category.category.label())];
    if let Some(subcategory) = &category.subcategory {
        lines.push(format!("Subcategory: {}", subcategory));
    }
    lines.push(format!(
        "Confidence: {:.0}%{}",
        category.confidence_score * 100.0,
        if category.auto_detected { "" } else { " (manual)" }
    ));
    lines.push(format!(
        "Workflow ({}): {}",
        category.suggested_workflow.estimated_time,
        category.suggested_workflow.steps.join(" > ")
    ));

    lines.push(String::new());
    lines.push(format!(
        "Risks: {} unresolved, {} resolved",
        summary.unresolved, summary.resolved
    ));
    for risk in &analysis.risks {
        let marker = if risk.is_resolved { " (resolved)" } else { "" };
        lines.push(format!(
            "  [{}] {}: {}{}",
            risk.severity.label(),
            risk.risk_type.label(),
            risk.description,
            marker
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebrief_core::{Category, CategoryOverride, RiskType};
    use casebrief_store::MemoryStore;

    const FIR: &str = "FIRST INFORMATION REPORT\nPolice station: Central\n\
        The complainant reported the incident on 15/25/2024.";

    fn engines() -> RuleEngines {
        RuleEngines::from_config(&Default::default()).unwrap()
    }

    #[tokio::test]
    async fn test_first_analysis_persists_everything() {
        let store = MemoryStore::new();
        let analysis = analyze_document(&store, &engines(), 1, FIR, false)
            .await
            .unwrap();

        assert_eq!(analysis.category.category, Category::Fir);
        assert!(analysis.category.auto_detected);
        assert!(analysis
            .risks
            .iter()
            .any(|r| r.risk_type == RiskType::Ambiguity));
        assert_eq!(analysis.summary.total, analysis.risks.len());
        assert_eq!(store.list_risk_flags(1).await.unwrap(), analysis.risks);
    }

    #[tokio::test]
    async fn test_second_analysis_reuses_stored_records() {
        let store = MemoryStore::new();
        let engines = engines();
        let first = analyze_document(&store, &engines, 1, FIR, false)
            .await
            .unwrap();

        store
            .override_category(1, CategoryOverride::new(Category::CaseRecord))
            .await
            .unwrap();

        let second = analyze_document(&store, &engines, 1, "unrelated text", false)
            .await
            .unwrap();
        assert_eq!(second.risks, first.risks);
        assert_eq!(second.category.category, Category::CaseRecord);
        assert!(!second.category.auto_detected);
    }

    #[tokio::test]
    async fn test_reanalysis_appends_flags_and_reclassifies() {
        let store = MemoryStore::new();
        let engines = engines();
        let first = analyze_document(&store, &engines, 1, FIR, false)
            .await
            .unwrap();

        let second = analyze_document(&store, &engines, 1, FIR, true)
            .await
            .unwrap();
        assert_eq!(second.risks.len(), first.risks.len() * 2);
        assert_eq!(second.category.id, first.category.id);
        assert_eq!(second.category.category, Category::Fir);
    }

    #[tokio::test]
    async fn test_clean_text_creates_no_flags() {
        let store = MemoryStore::new();
        let analysis = analyze_document(&store, &engines(), 3, "   ", false)
            .await
            .unwrap();
        assert!(analysis.risks.is_empty());
        assert!(analysis.summary.is_clear());
        assert_eq!(analysis.category.category, Category::Other);
    }

    #[tokio::test]
    async fn test_report_uses_display_labels() {
        let store = MemoryStore::new();
        let analysis = analyze_document(&store, &engines(), 1, FIR, false)
            .await
            .unwrap();
        let report = render_report(&analysis);

        assert!(report.starts_with("Category: FIR (First Information Report)\n"));
        assert!(report.contains("Subcategory: Criminal"));
        assert!(report.contains("Confidence: 92%\n"));
        assert!(report.contains("[High] Missing Section: Missing required sections:"));
        assert!(report.contains("[Medium] Ambiguity: Ambiguous date formats detected"));
        assert!(!report.contains("(resolved)"));
    }

    #[test]
    fn test_preview_matches_engines() {
        let engines = engines();
        assert_eq!(preview(&engines, FIR), engines.analyze(FIR));
    }
}
