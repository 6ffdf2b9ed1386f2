use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::api::client::ApiError;
use crate::trip::{non_empty, share_link, Driver, SourceTag, Trip, TripInput};

/// A trip as stored in the remote collection. The remote table uses its own column names, this
/// type and the two mapping functions next to it are the only places that know about them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    #[serde(
        default,
        deserialize_with = "id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub horario: String,

    #[serde(default)]
    pub motorista: String,

    #[serde(default)]
    pub origem: String,

    #[serde(default)]
    pub destino: String,

    #[serde(default)]
    pub passageiro: Option<String>,

    #[serde(default)]
    pub observacoes: Option<String>,

    #[serde(default)]
    pub whatsapp_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criado_em: Option<String>,

    /// Older rows only carry the table's own creation column.
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sincronizado: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origem_dados: Option<String>,
}

/// Normalizes a remote row into the canonical trip shape. Rows without an identifier can't be
/// addressed later and are rejected.
pub fn from_remote_row(row: TripRow) -> Result<Trip, ApiError> {
    let id = row
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::InvalidRow("row has no id".to_string()))?;

    let created_at = row
        .criado_em
        .as_deref()
        .or(row.created_at.as_deref())
        .and_then(|raw| match OffsetDateTime::parse(raw, &Rfc3339) {
            Ok(ts) => Some(ts),
            Err(err) => {
                tracing::debug!(%id, "ignoring unparsable creation time {raw:?}: {err}");
                None
            }
        });

    let share_link = match row.whatsapp_link.filter(|link| !link.is_empty()) {
        Some(link) => link,
        None => share_link(&TripInput {
            date: row.data.clone(),
            time: row.horario.clone(),
            driver: row.motorista.clone(),
            origin: row.origem.clone(),
            destination: row.destino.clone(),
            passenger: row.passageiro.clone(),
            notes: row.observacoes.clone(),
        }),
    };

    Ok(Trip {
        id,
        date: row.data,
        time: row.horario,
        driver: Driver::from(row.motorista),
        origin: row.origem,
        destination: row.destino,
        passenger: non_empty(row.passageiro.as_deref()),
        notes: non_empty(row.observacoes.as_deref()),
        share_link,
        created_at,
        synced: row.sincronizado != Some(false),
        source: SourceTag::Remote,
    })
}

/// The payload written to the remote collection for a trip. Local bookkeeping (the queue
/// identifier and provenance tag) stays behind, the remote assigns its own identifier.
pub fn to_remote_row(trip: &Trip) -> TripRow {
    TripRow {
        id: None,
        data: trip.date.clone(),
        horario: trip.time.clone(),
        motorista: trip.driver.to_string(),
        origem: trip.origin.clone(),
        destino: trip.destination.clone(),
        passageiro: trip.passenger.clone(),
        observacoes: trip.notes.clone(),
        whatsapp_link: Some(trip.share_link.clone()).filter(|link| !link.is_empty()),
        criado_em: trip.created_at.and_then(|ts| ts.format(&Rfc3339).ok()),
        created_at: None,
        sincronizado: Some(true),
        origem_dados: None,
    }
}

/// Remote identifiers may be serial integers or strings depending on the table definition.
fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}
