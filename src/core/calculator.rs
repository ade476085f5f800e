//! A currency calculator session.
//!
//! The session owns the user's selection and the rate table fetched when it
//! starts. Results are recomputed through [`CurrencyCalculator::calculate`],
//! which only notifies history and analytics when the calculation actually
//! changed.
use std::sync::Arc;
use tracing::{debug, error};

use crate::core::analytics::{self, AnalyticsSink};
use crate::core::converter::{self, ConversionInput, ConversionResult};
use crate::core::currency::normalize_code;
use crate::core::history::{CURRENCY_KIND, HistoryRecorder};
use crate::core::rates::{ExchangeRateTable, RateProvider};
use crate::core::share::{self, ShareOutcome, Sharer};
use crate::providers::exchangerate_api::ATTRIBUTION_URL;

pub struct CurrencyCalculator {
    amount: String,
    from_currency: String,
    to_currency: String,
    rates: ExchangeRateTable,
    loading: bool,
    result: Option<ConversionResult>,
    last_recorded: Option<(ConversionInput, ConversionResult)>,
    last_pair: Option<(String, String)>,
    history: Arc<dyn HistoryRecorder>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl CurrencyCalculator {
    pub fn new(
        from: &str,
        to: &str,
        history: Arc<dyn HistoryRecorder>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            amount: String::new(),
            from_currency: normalize_code(from),
            to_currency: normalize_code(to),
            rates: ExchangeRateTable::default(),
            loading: true,
            result: None,
            last_recorded: None,
            last_pair: None,
            history,
            analytics,
        }
    }

    /// Fetches the rate table once. A failure is logged and leaves the table
    /// empty, so no result can ever be produced in this session.
    pub async fn load_rates(&mut self, provider: &dyn RateProvider, base: &str) -> bool {
        let loaded = match provider.fetch_rates(base).await {
            Ok(table) => {
                debug!(count = table.len(), "Exchange rates loaded");
                self.rates = table;
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch exchange rates");
                false
            }
        };
        self.loading = false;
        self.calculate();
        loaded
    }

    /// Replaces the rate table wholesale and recalculates.
    pub fn set_rates(&mut self, rates: ExchangeRateTable) {
        self.rates = rates;
        self.loading = false;
        self.calculate();
    }

    /// Accepts empty input or anything that parses as a finite number, with
    /// decimal commas allowed. Rejected input keeps the previous amount.
    pub fn set_amount(&mut self, raw: &str) -> bool {
        let normalized = converter::normalize_amount(raw);
        if !normalized.is_empty() && !normalized.parse::<f64>().is_ok_and(f64::is_finite) {
            debug!(input = raw, "Rejected amount input");
            return false;
        }
        if normalized != self.amount {
            self.amount = normalized;
            self.calculate();
        }
        true
    }

    pub fn set_from(&mut self, code: &str) {
        let code = normalize_code(code);
        if code != self.from_currency {
            self.from_currency = code;
            self.calculate();
        }
    }

    pub fn set_to(&mut self, code: &str) {
        let code = normalize_code(code);
        if code != self.to_currency {
            self.to_currency = code;
            self.calculate();
        }
    }

    pub fn input(&self) -> ConversionInput {
        ConversionInput::new(&self.amount, &self.from_currency, &self.to_currency)
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from_currency(&self) -> &str {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &str {
        &self.to_currency
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<ConversionResult> {
        self.result
    }

    /// Recomputes the result from the current selection.
    pub fn calculate(&mut self) -> Option<ConversionResult> {
        let input = self.input();
        self.track_pair_selection(&input);

        self.result = converter::convert_input(&input, &self.rates);
        if let Some(result) = self.result {
            let recorded = (input, result);
            if self.last_recorded.as_ref() != Some(&recorded) {
                let (input, result) = &recorded;
                self.history.add_calculation(
                    CURRENCY_KIND,
                    serde_json::to_value(input).unwrap_or_default(),
                    serde_json::to_value(result).unwrap_or_default(),
                );
                self.last_recorded = Some(recorded);
            }
        }
        self.result
    }

    fn track_pair_selection(&mut self, input: &ConversionInput) {
        if input.from_currency.is_empty() || input.to_currency.is_empty() {
            return;
        }
        let pair = (input.from_currency.clone(), input.to_currency.clone());
        if self.last_pair.as_ref() != Some(&pair) {
            self.analytics.track_event(
                analytics::SELECT_CURRENCY_EVENT,
                analytics::currency_selection_props(input),
            );
            self.last_pair = Some(pair);
        }
    }

    /// Shares the current result. Without a result nothing happens; share
    /// failures are logged and reported as `None`.
    pub fn share(&self, sharer: &Sharer, page_url: &str) -> Option<ShareOutcome> {
        let result = self.result?;
        let amount = converter::parse_amount(&self.amount)?;
        let input = self.input();

        let payload = share::build_share_payload(amount, &input, &result, page_url);

        self.analytics
            .track_share(analytics::SHARE_ACTION, analytics::SHARE_CONTEXT);
        self.analytics.track_calculation(
            CURRENCY_KIND,
            analytics::calculation_props(amount, &input, &result),
        );

        match sharer.share(&payload) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(error = %e, "Failed to share conversion");
                None
            }
        }
    }

    /// Reports a visit to the data provider's site and returns its URL.
    pub fn open_attribution_link(&self) -> &'static str {
        self.analytics
            .track_external_link_click(analytics::EXCHANGE_RATE_API_LINK, ATTRIBUTION_URL);
        ATTRIBUTION_URL
    }
}
