use super::styles;
use chrono::{DateTime, Utc};
use stickerapp::api::{CmdMessage, CmdResult, MessageLevel};
use stickerapp::daily_limit::DailyLimitStatus;
use stickerapp::model::{Sticker, StickerPack};
use stickerapp::store::DoctorReport;

const TIME_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn print_result(result: &CmdResult, mode: OutputMode) -> anyhow::Result<()> {
    let output = match mode {
        OutputMode::Json => format!("{}\n", serde_json::to_string_pretty(result)?),
        OutputMode::Text => render_text(result),
    };
    print!("{}", output);
    Ok(())
}

pub fn render_text(result: &CmdResult) -> String {
    let mut out = String::new();

    if let Some(text) = &result.text {
        out.push_str(text);
        out.push('\n');
    }
    if !result.packs.is_empty() {
        out.push_str(&render_packs(&result.packs));
    }
    if !result.stickers.is_empty() {
        if !result.packs.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_stickers(&result.stickers));
    }
    if let Some(limit) = &result.limit {
        out.push_str(&render_limit(limit));
    }
    if let Some(report) = &result.report {
        out.push_str(&render_report_summary(report));
    }
    out.push_str(&render_messages(&result.messages));
    out
}

fn render_packs(packs: &[StickerPack]) -> String {
    let mut out = String::new();
    for pack in packs {
        let count = pack.sticker_ids.len();
        out.push_str(&format!(
            "{}  {}  {} {}  {}\n",
            styles::id().apply_to(&pack.id),
            styles::time().apply_to(format_time_ago(pack.created_at)),
            styles::title().apply_to(&pack.name),
            styles::muted().apply_to(format!(
                "({} sticker{})",
                count,
                if count == 1 { "" } else { "s" }
            )),
            styles::muted().apply_to(pack.publisher.as_deref().unwrap_or_default()),
        ));
    }
    out
}

fn render_stickers(stickers: &[Sticker]) -> String {
    let mut out = String::new();
    for sticker in stickers {
        let pack = sticker
            .pack_id
            .as_deref()
            .map(|p| format!("pack {}", p))
            .unwrap_or_else(|| "no pack".to_string());
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            styles::id().apply_to(&sticker.id),
            styles::time().apply_to(format_time_ago(sticker.created_at)),
            styles::muted().apply_to(pack),
            sticker.uri,
        ));
    }
    out
}

fn render_limit(limit: &DailyLimitStatus) -> String {
    let remaining = if limit.remaining == 0 {
        styles::error().apply_to(limit.remaining.to_string())
    } else {
        styles::highlight().apply_to(limit.remaining.to_string())
    };
    format!(
        "Generations left today: {} of {} {}\n",
        remaining,
        limit.limit,
        styles::muted().apply_to(format!("(day {})", limit.reset_date)),
    )
}

fn render_report_summary(report: &DoctorReport) -> String {
    let touched =
        report.missing_files + report.dangling_ids + report.cleared_pack_refs + report.relinked;
    if touched == 0 {
        String::new()
    } else {
        format!(
            "{}\n",
            styles::muted().apply_to(format!("{} fix(es) applied", touched))
        )
    }
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let styled = match message.level {
            MessageLevel::Info => styles::muted().apply_to(&message.content),
            MessageLevel::Success => styles::success().apply_to(&message.content),
            MessageLevel::Warning => styles::warning().apply_to(&message.content),
            MessageLevel::Error => styles::error().apply_to(&message.content),
        };
        out.push_str(&format!("{}\n", styled));
    }
    out
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
