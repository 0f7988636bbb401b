#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12
//!
//! Facade for the X12 EDI processing engine. An [`Engine`] holds the schema
//! and partner registries and exposes the pipeline end to end:
//!
//! ```
//! use x12::{Engine, ValidationProfile};
//!
//! let edi = b"ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       \
//! *240101*1200*^*00501*000000001*0*P*:~GS*HS*SENDER*RECEIVER*20240101*1200*1*X*005010X279A1~\
//! ST*270*0001*005010X279A1~BHT*0022*13*REF1*20240101*1200~HL*1**20*1~SE*4*0001~GE*1*1~IEA*1*000000001~";
//!
//! let engine = Engine::new();
//! let parsed = engine.parse(edi).unwrap();
//! let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());
//! assert!(report.is_valid());
//!
//! let ack = engine.ack997(&parsed.interchange, &report);
//! let bytes = engine.generate(&ack, None).unwrap();
//! assert!(bytes.starts_with(b"ISA"));
//! ```

use std::io::Read;

pub use x12_ack::{AckBuilder, AckKind, GroupAck, GroupAckCode, TransactionAck, TransactionAckCode};
pub use x12_codec::{
    CrossChecks, EnvelopeSummary, Generator, InterchangeBuilder, ParseOutput, ParseWarning,
    TransactionStream, WarningKind,
};
pub use x12_ir::{
    Delimiters, Element, ElementValue, FunctionalGroup, Interchange, Loop, Position, Segment,
    TransactionSet,
};
pub use x12_partners::{PartnerRegistry, TradingPartner};
pub use x12_schema::{SchemaLoader, SchemaRegistry, TransactionSchema};
pub use x12_validation::{
    Finding, Location, RuleCategory, Severity, StrictnessLevel, ValidationProfile,
    ValidationReport, Validator,
};

use thiserror::Error;
use tracing::info;

/// Umbrella error for the engine surface
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] x12_codec::Error),

    #[error(transparent)]
    Validation(#[from] x12_validation::Error),

    #[error(transparent)]
    Partner(#[from] x12_partners::Error),
}

/// Result type for the engine surface.
pub type Result<T> = std::result::Result<T, Error>;

/// The processing engine: schema registry plus partner configuration
pub struct Engine {
    schemas: SchemaRegistry,
    partners: PartnerRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the built-in schemas and no partners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: SchemaRegistry::with_builtin(),
            partners: PartnerRegistry::new(),
        }
    }

    /// Engine with an explicit schema registry.
    #[must_use]
    pub fn with_schemas(schemas: SchemaRegistry) -> Self {
        Self {
            schemas,
            partners: PartnerRegistry::new(),
        }
    }

    /// The schema registry.
    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Parse bytes into an interchange tree plus parse warnings.
    pub fn parse(&self, input: &[u8]) -> Result<ParseOutput> {
        let output = InterchangeBuilder::new(&self.schemas).build(input)?;
        info!(
            groups = output.interchange.functional_groups.len(),
            transactions = output.interchange.transaction_count(),
            warnings = output.warnings.len(),
            "parsed interchange"
        );
        Ok(output)
    }

    /// Validate a parsed interchange, folding parse warnings into the
    /// report so findings stay ordered by first occurrence.
    #[must_use]
    pub fn validate(&self, parsed: &ParseOutput, profile: &ValidationProfile) -> ValidationReport {
        let validator = Validator::with_profile(&self.schemas, profile.clone());
        let mut report = ValidationReport::new();
        for warning in &parsed.warnings {
            report.add(warning_to_finding(warning));
        }
        report.merge(validator.validate(&parsed.interchange));
        report.sort_by_location();
        report
    }

    /// Validate and convert any error finding into a terminal failure.
    pub fn validate_strict(
        &self,
        parsed: &ParseOutput,
        profile: &ValidationProfile,
    ) -> Result<ValidationReport> {
        let report = self.validate(parsed, profile);
        if let Some(first) = report.errors().next() {
            return Err(x12_validation::Error::Rejected {
                error_count: report.error_count(),
                first: format!("{} at {}", first.code, first.location),
            }
            .into());
        }
        Ok(report)
    }

    /// Serialize an interchange, optionally forcing a delimiter set.
    pub fn generate(&self, interchange: &Interchange, delimiters: Option<Delimiters>) -> Result<Vec<u8>> {
        let generator = match delimiters {
            Some(d) => Generator::with_delimiters(d),
            None => Generator::new(),
        };
        Ok(generator.generate(interchange)?)
    }

    /// Stream transaction sets from a byte source with bounded memory.
    pub fn stream<R: Read>(&self, reader: R) -> Result<TransactionStream<'_, R>> {
        Ok(TransactionStream::new(reader, &self.schemas)?)
    }

    /// Derive a 997 Functional Acknowledgment interchange.
    #[must_use]
    pub fn ack997(&self, inbound: &Interchange, report: &ValidationReport) -> Interchange {
        AckBuilder::new().build_997(inbound, report)
    }

    /// Derive a 999 Implementation Acknowledgment interchange.
    #[must_use]
    pub fn ack999(&self, inbound: &Interchange, report: &ValidationReport) -> Interchange {
        AckBuilder::new().build_999(inbound, report)
    }

    /// Register a trading partner.
    pub fn register_partner(&mut self, partner: TradingPartner) -> Result<()> {
        Ok(self.partners.register(partner)?)
    }

    /// Partner by id.
    #[must_use]
    pub fn partner(&self, partner_id: &str) -> Option<&TradingPartner> {
        self.partners.get(partner_id)
    }

    /// Partner matched to an inbound interchange's sender identity.
    #[must_use]
    pub fn partner_for(&self, interchange: &Interchange) -> Option<&TradingPartner> {
        self.partners
            .get_by_interchange(&interchange.sender_id, &interchange.sender_qualifier)
    }
}

fn warning_to_finding(warning: &ParseWarning) -> Finding {
    let severity = if warning.kind.is_error() {
        Severity::Error
    } else {
        Severity::Warning
    };
    let category = match warning.kind {
        WarningKind::VersionMismatch => RuleCategory::Structure,
        _ => RuleCategory::Schema,
    };
    let mut location = Location::default();
    location.group = warning.group_index;
    location.transaction = warning.transaction_index;
    Finding::new(severity, warning.kind.code(), category, warning.message.clone(), location)
}
