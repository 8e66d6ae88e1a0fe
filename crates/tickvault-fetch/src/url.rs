//! Yahoo Finance URL construction.

use tickvault_types::Ticker;

/// Base URL for the quote-summary API host.
pub const QUERY2_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Base URL for the chart and crumb API host.
pub const QUERY1_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// URL visited to obtain the session cookie the crumb is bound to.
pub const COOKIE_URL: &str = "https://fc.yahoo.com";

/// quoteSummary modules that together make up the full snapshot.
pub const SNAPSHOT_MODULES: &[&str] = &[
    "assetProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "price",
    "quoteType",
];

/// quoteSummary modules holding the annual financial statements.
pub const STATEMENT_MODULES: &[&str] = &[
    "balanceSheetHistory",
    "cashflowStatementHistory",
    "incomeStatementHistory",
];

/// Builds a quoteSummary URL for the given modules.
///
/// URL format: `{base}/v10/finance/quoteSummary/{TICKER}?modules={m1,m2}&crumb={crumb}`
///
/// # Example
///
/// ```
/// use tickvault_fetch::url::quote_summary_url;
/// use tickvault_types::Ticker;
///
/// let ticker = Ticker::new("aapl").unwrap();
/// let url = quote_summary_url("https://query2.finance.yahoo.com", &ticker, &["price"], "abc");
/// assert_eq!(
///     url,
///     "https://query2.finance.yahoo.com/v10/finance/quoteSummary/AAPL?modules=price&crumb=abc"
/// );
/// ```
#[must_use]
pub fn quote_summary_url(base: &str, ticker: &Ticker, modules: &[&str], crumb: &str) -> String {
    format!(
        "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
        base.trim_end_matches('/'),
        encode_symbol(ticker.as_str()),
        modules.join(","),
        encode_symbol(crumb)
    )
}

/// Builds the full-history daily chart URL including dividend and split events.
///
/// URL format: `{base}/v8/finance/chart/{TICKER}?range=max&interval=1d&events=div,splits`
#[must_use]
pub fn chart_url(base: &str, ticker: &Ticker) -> String {
    format!(
        "{}/v8/finance/chart/{}?range=max&interval=1d&events=div,splits",
        base.trim_end_matches('/'),
        encode_symbol(ticker.as_str())
    )
}

/// Builds the crumb endpoint URL.
#[must_use]
pub fn crumb_url(base: &str) -> String {
    format!("{}/v1/test/getcrumb", base.trim_end_matches('/'))
}

/// Percent-encodes the characters that appear in index and currency symbols.
fn encode_symbol(symbol: &str) -> String {
    let mut encoded = String::with_capacity(symbol.len());
    for c in symbol.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => encoded.push(c),
            other => {
                let mut buf = [0u8; 4];
                for byte in other.encode_utf8(&mut buf).bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    encoded
}
