use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AnalysisError;

/// Display language for every user-facing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Es => write!(f, "es"),
            Language::En => write!(f, "en"),
        }
    }
}

impl Language {
    /// Shown when nothing has been submitted yet.
    pub fn prompt(self) -> &'static str {
        match self {
            Language::Es => "Por favor, introduce un ticker y haz clic en \"Analizar Acción\".",
            Language::En => "Please enter a ticker and click \"Analyze Stock\".",
        }
    }

    pub fn invalid_param(self, name: &str, value: &str) -> String {
        match self {
            Language::Es => format!("Valor no válido para {}: {}", name, value),
            Language::En => format!("Invalid value for {}: {}", name, value),
        }
    }

    pub fn error_message(self, err: &AnalysisError) -> String {
        match (self, err) {
            (Language::Es, AnalysisError::EmptyInput { .. }) => "No se encontraron datos para el ticker o el rango de fechas seleccionado. Por favor, verifica el ticker.".to_string(),
            (Language::En, AnalysisError::EmptyInput { .. }) => "No data found for the selected ticker or date range. Please check the ticker.".to_string(),
            (Language::Es, AnalysisError::DataSource(e)) => {
                format!("Ocurrió un error al descargar los datos: {}", e)
            }
            (Language::En, AnalysisError::DataSource(e)) => {
                format!("An error occurred while downloading the data: {}", e)
            }
            (_, AnalysisError::InvalidWindow(_)) => err.to_string(),
        }
    }
}

/// Titles, legends and axis names for one analysis.
///
/// The moving-average legends say "days" although the windows count trading
/// bars; that wording is kept as users know it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labels {
    pub language: Language,
    pub header: String,
    pub trend_heading: String,
    pub returns_heading: String,
    pub close: String,
    pub ma_short: String,
    pub ma_long: String,
    pub trend_title: String,
    pub price_axis: String,
    pub returns_title: String,
    pub return_axis: String,
    pub count_axis: String,
}

impl Labels {
    pub fn new(language: Language, ticker: &str, short_window: usize, long_window: usize) -> Self {
        match language {
            Language::Es => Self {
                language,
                header: format!("Análisis Técnico para {}", ticker),
                trend_heading: "Tendencia del Precio y Medias Móviles".to_string(),
                returns_heading: "Análisis de Volatilidad (Distribución de Retornos Diarios)"
                    .to_string(),
                close: "Precio de Cierre Ajustado".to_string(),
                ma_short: format!("Media Móvil {} Días", short_window),
                ma_long: format!("Media Móvil {} Días", long_window),
                trend_title: format!("Tendencia del Precio de {}", ticker),
                price_axis: "Precio (USD)".to_string(),
                returns_title: format!("Distribución de Retornos Diarios de {}", ticker),
                return_axis: "Retorno Diario".to_string(),
                count_axis: "Frecuencia".to_string(),
            },
            Language::En => Self {
                language,
                header: format!("Technical Analysis for {}", ticker),
                trend_heading: "Price Trend and Moving Averages".to_string(),
                returns_heading: "Volatility Analysis (Daily Return Distribution)".to_string(),
                close: "Adjusted Close Price".to_string(),
                ma_short: format!("{}-Day Moving Average", short_window),
                ma_long: format!("{}-Day Moving Average", long_window),
                trend_title: format!("{} Price Trend", ticker),
                price_axis: "Price (USD)".to_string(),
                returns_title: format!("{} Daily Return Distribution", ticker),
                return_axis: "Daily Return".to_string(),
                count_axis: "Count".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataSourceError;

    #[test]
    fn test_parse_language() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(" EN ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Es);
    }

    #[test]
    fn test_labels_follow_windows() {
        let es = Labels::new(Language::Es, "AAPL", 50, 200);
        assert_eq!(es.ma_short, "Media Móvil 50 Días");
        assert_eq!(es.ma_long, "Media Móvil 200 Días");
        assert_eq!(es.header, "Análisis Técnico para AAPL");

        let en = Labels::new(Language::En, "MSFT", 20, 100);
        assert_eq!(en.ma_short, "20-Day Moving Average");
        assert_eq!(en.trend_title, "MSFT Price Trend");
    }

    #[test]
    fn test_error_messages_are_localized() {
        let empty = AnalysisError::EmptyInput {
            ticker: "ZZZZ".to_string(),
        };
        assert!(Language::Es.error_message(&empty).starts_with("No se encontraron datos"));
        assert!(Language::En.error_message(&empty).starts_with("No data found"));

        let failed = AnalysisError::DataSource(DataSourceError::Request("timeout".to_string()));
        let msg = Language::En.error_message(&failed);
        assert!(msg.starts_with("An error occurred while downloading the data"));
        assert!(msg.contains("timeout"));
    }

    #[test]
    fn test_invalid_param_message() {
        assert_eq!(
            Language::En.invalid_param("start", "tomorrow"),
            "Invalid value for start: tomorrow"
        );
        assert_eq!(
            Language::Es.invalid_param("lang", "fr"),
            "Valor no válido para lang: fr"
        );
    }
}
