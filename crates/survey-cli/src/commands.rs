//! Subcommand implementations. Each returns what it compiled; printing is
//! left to the caller.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use survey_form::{FormDescription, MemoryRecord, compile_form, initialize_record};
use survey_model::{Attribute, Dialog, ProtocolDocument};
use survey_protocol::{DecodeOptions, Decoder};
use survey_storage::{CompileOptions, StorageSchema, compile_with};
use tracing::{info, info_span};

use crate::cli::{FormArgs, ProtocolArgs, StorageArgs};

/// Read and decode a protocol document.
pub fn load_protocol(path: &Path, options: DecodeOptions) -> Result<ProtocolDocument> {
    let _span = info_span!("load_protocol", path = %path.display()).entered();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read protocol {}", path.display()))?;
    let document = Decoder::new(options)
        .decode_slice(&bytes)
        .with_context(|| format!("protocol {} was rejected", path.display()))?;
    info!(features = document.features.len(), "protocol accepted");
    Ok(document)
}

fn load(args: &ProtocolArgs) -> Result<ProtocolDocument> {
    load_protocol(&args.protocol, args.decode_options())
}

pub fn run_check(args: &ProtocolArgs) -> Result<ProtocolDocument> {
    load(args)
}

/// A compiled storage schema and its fingerprint.
#[derive(Debug)]
pub struct StorageReport {
    pub schema: StorageSchema,
    pub fingerprint: String,
}

impl StorageReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "fingerprint": self.fingerprint,
            "tables": self.schema.tables,
        })
    }
}

pub fn run_storage(args: &StorageArgs) -> Result<StorageReport> {
    let document = load(&args.protocol)?;
    let options = CompileOptions::new().baseline_path(args.baseline.clone());
    let schema = compile_with(&document, &options).context("failed to compile storage schema")?;
    let fingerprint = schema.fingerprint()?;
    Ok(StorageReport {
        schema,
        fingerprint,
    })
}

pub fn run_form(args: &FormArgs) -> Result<FormDescription> {
    let document = load(&args.protocol)?;
    let (dialog, attributes) = select_dialog(&document, args.feature.as_deref())?;

    let mut record = match &args.record {
        Some(path) => read_record(path, attributes)?,
        None => MemoryRecord::new(),
    };
    if args.init {
        initialize_record(dialog, attributes, &mut record);
    }
    Ok(compile_form(dialog, attributes, &record))
}

/// The dialog and attribute list of `feature`, or of the mission.
pub fn select_dialog<'a>(
    document: &'a ProtocolDocument,
    feature: Option<&str>,
) -> Result<(&'a Dialog, &'a [Attribute])> {
    match feature {
        Some(name) => {
            let feature = document.feature(name).ok_or_else(|| {
                anyhow!(
                    "protocol has no feature named {name} (features: {})",
                    document.feature_names().join(", ")
                )
            })?;
            let Some(dialog) = &feature.dialog else {
                bail!("feature {} has no dialog", feature.name);
            };
            Ok((dialog, feature.attributes.as_slice()))
        }
        None => {
            let Some(mission) = &document.mission else {
                bail!("protocol has no mission; pass --feature");
            };
            let Some(dialog) = &mission.dialog else {
                bail!("mission has no dialog");
            };
            Ok((dialog, mission.attributes.as_slice()))
        }
    }
}

fn read_record(path: &Path, attributes: &[Attribute]) -> Result<MemoryRecord> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("record {} is not valid JSON", path.display()))?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("record {} must be a JSON object", path.display()))?;
    Ok(MemoryRecord::from_json(object, attributes))
}
