//! Pass-through categories

use crate::config::UpstreamConfig;
use crate::upstream::Endpoint;
use clap::ValueEnum;

/// Price categories served live from upstream on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Category {
    Gold,
    CurrencyCodes,
    CurrencyRates,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Gold, Category::CurrencyCodes, Category::CurrencyRates];

    /// HTTP route for this category
    pub fn path(self) -> &'static str {
        match self {
            Category::Gold => "/gold-rapidapi",
            Category::CurrencyCodes => "/currency-codes-rapidapi",
            Category::CurrencyRates => "/currency-rates-rapidapi",
        }
    }

    /// Endpoint name used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Category::Gold => "gold",
            Category::CurrencyCodes => "currency_codes",
            Category::CurrencyRates => "currency_rates",
        }
    }
}

/// One resolved endpoint per category
#[derive(Debug, Clone)]
pub struct PassthroughEndpoints {
    pub gold: Endpoint,
    pub currency_codes: Endpoint,
    pub currency_rates: Endpoint,
}

impl PassthroughEndpoints {
    /// Resolve every category from config, reading credentials from the environment
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            gold: Endpoint::from_config(Category::Gold.name(), &config.gold),
            currency_codes: Endpoint::from_config(Category::CurrencyCodes.name(), &config.currency_codes),
            currency_rates: Endpoint::from_config(Category::CurrencyRates.name(), &config.currency_rates),
        }
    }

    pub fn get(&self, category: Category) -> &Endpoint {
        match category {
            Category::Gold => &self.gold,
            Category::CurrencyCodes => &self.currency_codes,
            Category::CurrencyRates => &self.currency_rates,
        }
    }
}
