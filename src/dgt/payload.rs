use serde::Serialize;

const FILTROS_VIA: [&str; 5] = [
    "Carreteras cortadas",
    "Tráfico lento",
    "Circulación restringida",
    "Desvíos y embolsamientos",
    "Otras vialidades",
];

const FILTROS_CAUSA: [&str; 5] = [
    "Obras",
    "Accidente",
    "Meteorológicos",
    "Restricciones de circulación",
    "Otras incidencias",
];

/// Headers the eTraffic web client sends; the API rejects bare requests.
const REQUEST_HEADERS: [(&str, &str); 5] = [
    ("accept", "*/*"),
    ("content-type", "application/json"),
    ("origin", "https://etraffic.dgt.es"),
    ("referer", "https://etraffic.dgt.es/etrafficWEB/"),
    ("accept-language", "es-ES,es;q=0.9"),
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    pub filtros_via: Vec<String>,
    pub filtros_causa: Vec<String>,
}

impl Default for FilterPayload {
    /// Every road and cause category the map displays.
    fn default() -> Self {
        Self {
            filtros_via: FILTROS_VIA.iter().map(|s| s.to_string()).collect(),
            filtros_causa: FILTROS_CAUSA.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A fully-specified upstream POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl UpstreamRequest {
    /// The `getFilteredData` call against `endpoint`.
    pub fn filtered_data(endpoint: &str) -> worker::Result<Self> {
        let body = serde_json::to_string(&FilterPayload::default())
            .map_err(|e| worker::Error::RustError(format!("payload serialize error: {e}")))?;
        Ok(Self {
            url: endpoint.to_string(),
            headers: REQUEST_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        })
    }
}
