// In crates/report/src/render.rs

use chrono::NaiveDateTime;
use core_types::{Evaluation, EvaluationResult, Signal, Ticker};

use crate::types::{FailedRowPolicy, Labels, MarketFormat, MarketFormats, ReportSettings};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Everything that shapes the document apart from the per-ticker outcomes.
#[derive(Debug, Clone)]
pub struct ReportDefinition {
    pub settings: ReportSettings,
    pub markets: MarketFormats,
    /// Windows of the two averages, used in the column headings.
    pub short_period: usize,
    pub long_period: usize,
}

/// One table row, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub ticker_name: String,
    pub price: String,
    pub ma_short: String,
    pub ma_long: String,
    pub signal: String,
}

impl ReportRow {
    pub fn evaluated(ticker: &Ticker, result: &EvaluationResult, format: MarketFormat, labels: &Labels) -> Self {
        let signal = match result.signal {
            Signal::GoldenCross => &labels.golden_cross,
            Signal::Waiting => &labels.waiting,
        };
        Self {
            ticker_name: ticker.name.clone(),
            price: format.format(result.last_close),
            ma_short: format.format(result.ma_short),
            ma_long: format.format(result.ma_long),
            signal: signal.clone(),
        }
    }

    pub fn placeholder(ticker: &Ticker, signal: &str, labels: &Labels) -> Self {
        Self {
            ticker_name: ticker.name.clone(),
            price: labels.empty_cell.clone(),
            ma_short: labels.empty_cell.clone(),
            ma_long: labels.empty_cell.clone(),
            signal: signal.to_string(),
        }
    }

    fn to_markdown(&self) -> String {
        format!(
            "| {} | {} | {} | {} | {} |",
            escape_cell(&self.ticker_name),
            escape_cell(&self.price),
            escape_cell(&self.ma_short),
            escape_cell(&self.ma_long),
            escape_cell(&self.signal),
        )
    }
}

/// A complete report, ready to be rendered as Markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub heading: String,
    pub columns: [String; 5],
    pub rows: Vec<ReportRow>,
    pub footer: Option<String>,
}

impl Report {
    /// Builds the report from per-ticker outcomes, in the order given.
    ///
    /// Failures are logged here and either become a placeholder row or are
    /// left out, according to [`FailedRowPolicy`]. They never stop the rest
    /// of the table from being built.
    pub fn compile<'a, I>(definition: &ReportDefinition, generated_at: NaiveDateTime, outcomes: I) -> Self
    where
        I: IntoIterator<Item = (&'a Ticker, core_types::Result<Evaluation>)>,
    {
        let settings = &definition.settings;
        let labels = &settings.labels;

        let rows = outcomes
            .into_iter()
            .filter_map(|(ticker, outcome)| match outcome {
                Ok(Evaluation::Ready(result)) => {
                    let format = definition.markets.for_market(&ticker.market);
                    Some(ReportRow::evaluated(ticker, &result, format, labels))
                }
                Ok(Evaluation::InsufficientData { bars }) => {
                    tracing::info!(ticker = %ticker.name, symbol = %ticker.symbol, bars, "Not enough history for moving averages.");
                    Some(ReportRow::placeholder(ticker, &labels.no_data, labels))
                }
                Err(err) => {
                    tracing::error!(ticker = %ticker.name, symbol = %ticker.symbol, error = %err, "Failed to evaluate ticker.");
                    match settings.failed_rows {
                        FailedRowPolicy::Placeholder => Some(ReportRow::placeholder(ticker, &labels.failed, labels)),
                        FailedRowPolicy::Skip => None,
                    }
                }
            })
            .collect();

        Self {
            heading: format!(
                "## {} {} ({})",
                settings.emoji,
                settings.title,
                generated_at.format(TIMESTAMP_FORMAT)
            ),
            columns: [
                "종목명".to_string(),
                "현재가".to_string(),
                format!("{}일 이평선", definition.short_period),
                format!("{}일 이평선", definition.long_period),
                "신호".to_string(),
            ],
            rows,
            footer: settings
                .include_footer
                .then(|| footer(labels, definition.short_period, definition.long_period)),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            self.heading.clone(),
            String::new(),
            format!("| {} |", self.columns.join(" | ")),
            format!("|{}", " :--- |".repeat(self.columns.len())),
        ];
        lines.extend(self.rows.iter().map(ReportRow::to_markdown));
        if let Some(footer) = &self.footer {
            lines.push(String::new());
            lines.push(footer.clone());
        }
        let mut document = lines.join("\n");
        document.push('\n');
        document
    }
}

fn footer(labels: &Labels, short_period: usize, long_period: usize) -> String {
    format!(
        "### 신호 안내\n\
         - **{}**: {short_period}일 이평선이 {long_period}일 이평선을 아래에서 위로 돌파했습니다.\n\
         - **{}**: 새로운 골든크로스가 발생하지 않았습니다.\n\
         - **{}**: 이동평균을 계산할 거래일 데이터가 부족합니다.\n\
         - **{}**: 가격 데이터를 가져오지 못했습니다.\n\
         \n\
         > 이 리포트는 참고용이며 투자 권유가 아닙니다. 투자 판단과 책임은 투자자 본인에게 있습니다.",
        labels.golden_cross, labels.waiting, labels.no_data, labels.failed
    )
}

// A raw pipe would split the cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
