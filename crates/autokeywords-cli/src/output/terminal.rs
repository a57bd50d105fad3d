//! Terminal output formatter

use autokeywords_core::db::ContentItem;
use autokeywords_core::{BulkItemReport, Generation, ModelStatus, SettingsReport};

pub fn format_item(item: &ContentItem, tags: &[String]) -> String {
    let mut output = format!("#{} [{}] {}\n", item.id, item.item_type, item.title);
    if let Some(ref filename) = item.filename {
        output.push_str(&format!("  File:      {}\n", filename));
    }
    match item.keywords.as_deref() {
        Some(keywords) if !keywords.is_empty() => {
            output.push_str(&format!("  Keywords:  {}\n", keywords));
            if let Some(ref model) = item.keywords_model {
                output.push_str(&format!("  Model:     {}\n", model));
            }
        }
        _ => output.push_str("  Keywords:  (none)\n"),
    }
    if !tags.is_empty() {
        output.push_str(&format!("  Tags:      {}\n", tags.join(", ")));
    }
    output
}

pub fn format_item_line(item: &ContentItem) -> String {
    let status = if item.keywords.as_deref().is_some_and(|k| !k.is_empty()) {
        "✓"
    } else {
        " "
    };
    format!("{} #{:<5} {:<12} {}", status, item.id, item.item_type, item.title)
}

pub fn format_generation(generation: &Generation) -> String {
    let mut output = String::new();
    if let Some(ref notice) = generation.notice {
        output.push_str(&format!("Note: {}\n", notice));
    }
    if generation.keywords.is_empty() {
        output.push_str("No usable keywords were returned\n");
    } else {
        output.push_str(&format!("{}\n", generation.keywords));
    }
    output.push_str(&format!(
        "Model: {} ({})\n",
        generation.model_name, generation.model_id
    ));
    output
}

pub fn format_models(models: &[ModelStatus]) -> String {
    if models.is_empty() {
        return "No models in catalog\n".to_string();
    }

    let mut output = String::new();
    for model in models {
        let category = model
            .entry
            .category
            .map(|c| c.as_str())
            .unwrap_or("-");
        let state = if model.is_excluded { "excluded" } else { "ok" };
        output.push_str(&format!(
            "{:<40} {:<12} {:<9} {}\n",
            model.entry.id,
            category,
            state,
            model.entry.short_name()
        ));
        if let Some(ref error) = model.error {
            output.push_str(&format!(
                "  last error {} ({} total)\n",
                error.error_time, error.error_count
            ));
        }
    }
    output
}

pub fn format_bulk_item(report: &BulkItemReport) -> String {
    if report.success {
        let detail = report
            .keywords
            .clone()
            .or_else(|| report.tags.as_ref().map(|t| t.join(",")))
            .unwrap_or_default();
        format!("#{}: {}", report.item_id, detail)
    } else {
        format!(
            "#{}: failed: {}",
            report.item_id,
            report.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub fn format_settings(report: &SettingsReport) -> String {
    format!(
        "API key:         {}\n\
         Model:           {} ({})\n\
         Keyword count:   {}\n\
         Item types:      {}\n",
        report.api_key_preview,
        report.model_name,
        report.model,
        report.keyword_count,
        report.enabled_item_types.join(", ")
    )
}
