//! Ticket / store decoration
//!
//! Only decorates rendered tickets. Every field is optional and the
//! accessors fall back to defaults, so a missing configuration never blocks
//! printing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_NAME: &str = "RESTAURANT";
pub const DEFAULT_FOOTER: &str = "Thank you for your visit!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, alias = "nombre_fantasia")]
    pub name: Option<String>,
    #[serde(default, alias = "rut")]
    pub tax_id: Option<String>,
    #[serde(default, alias = "direccion")]
    pub address: Option<String>,
    #[serde(default, alias = "telefono")]
    pub phone: Option<String>,
    #[serde(default, alias = "mensaje_pie")]
    pub footer: Option<String>,
    #[serde(default, alias = "opciones_impresion")]
    pub options: DisplayOptions,
}

/// Which optional metadata lines a receipt shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default = "default_true", alias = "mostrar_mozo")]
    pub show_server: bool,
    #[serde(default = "default_true", alias = "mostrar_fecha")]
    pub show_date: bool,
    #[serde(default = "default_true", alias = "mostrar_hora")]
    pub show_time: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_server: true,
            show_date: true,
            show_time: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl StoreConfig {
    pub fn name(&self) -> &str {
        non_blank(&self.name).unwrap_or(DEFAULT_STORE_NAME)
    }

    pub fn tax_id(&self) -> Option<&str> {
        non_blank(&self.tax_id)
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    pub fn footer(&self) -> &str {
        non_blank(&self.footer).unwrap_or(DEFAULT_FOOTER)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_empty() {
        let config: StoreConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.name(), DEFAULT_STORE_NAME);
        assert_eq!(config.footer(), DEFAULT_FOOTER);
        assert_eq!(config.address(), None);
        assert_eq!(config.options, DisplayOptions::default());
    }

    #[test]
    fn test_legacy_names_and_blank_values() {
        let config: StoreConfig = serde_json::from_value(json!({
            "nombre_fantasia": "La Picada",
            "rut": "76.123.456-7",
            "direccion": "Av. Siempre Viva 742",
            "telefono": "  ",
            "mensaje_pie": "",
            "imprimir_logo": true,
            "opciones_impresion": {"mostrar_mozo": false, "mostrar_mesa": true}
        }))
        .unwrap();

        assert_eq!(config.name(), "La Picada");
        assert_eq!(config.tax_id(), Some("76.123.456-7"));
        assert_eq!(config.address(), Some("Av. Siempre Viva 742"));
        assert_eq!(config.phone(), None);
        assert_eq!(config.footer(), DEFAULT_FOOTER);
        assert!(!config.options.show_server);
        assert!(config.options.show_date);
    }
}
