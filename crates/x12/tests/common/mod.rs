//! Shared fixtures for the integration tests
#![allow(dead_code)]

/// Fixed-width ISA header used across fixtures (106 bytes, `*`/`~`/`:`/`^`).
pub const ISA: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *240101*1200*^*00501*000000001*0*P*:~";

/// A well-formed 835 remittance with one claim and one service line.
#[must_use]
pub fn remittance_835() -> String {
    format!(
        "{ISA}GS*HP*PAYER*PROVIDER*20240101*1200*1*X*005010X221A1~\
         ST*835*0001~\
         BPR*I*800*C*ACH~\
         TRN*1*12345*1512345678~\
         DTM*405*20240101~\
         N1*PR*ACME INSURANCE~\
         N3*1 PAYER WAY~\
         N4*METROPOLIS*NY*10001~\
         N1*PE*CLINIC*XX*1234567893~\
         LX*1~\
         CLP*A37YH556*1*800*500~\
         NM1*QC*1*DOE*JANE~\
         SVC*HC:99213*800*500~\
         DTM*472*20240101~\
         SE*14*0001~\
         GE*1*1~IEA*1*000000001~"
    )
}

/// A minimal, valid 270 eligibility inquiry.
#[must_use]
pub fn inquiry_270() -> String {
    format!(
        "{ISA}GS*HS*SENDER*RECEIVER*20240101*1200*1*X*005010X279A1~\
         ST*270*0001*005010X279A1~\
         BHT*0022*13*10001234*20240101*1200~\
         HL*1**20*1~\
         NM1*IL*1*DOE*JOHN~\
         SE*5*0001~\
         GE*1*1~IEA*1*000000001~"
    )
}

/// An 837P claim; `npi` lands in NM109 of the billing provider.
#[must_use]
pub fn claim_837(npi: &str) -> String {
    format!(
        "{ISA}GS*HC*SENDER*RECEIVER*20240101*1200*1*X*005010X222A1~\
         ST*837*0001*005010X222A1~\
         BHT*0019*00*244579*20240101*1200*CH~\
         NM1*41*2*SUBMITTER~\
         NM1*40*2*RECEIVER~\
         HL*1**20*1~\
         NM1*85*2*CLINIC*****XX*{npi}~\
         N3*123 MAIN ST~\
         N4*NOWHERE*TN*37203~\
         REF*EI*123456789~\
         HL*2*1*22*0~\
         SBR*P*18*******MC~\
         NM1*IL*1*DOE*JANE~\
         CLM*A37YH556*100***11:B:1~\
         HI*ABK:J45.909~\
         LX*1~\
         SV1*HC:99213*100*UN*1~\
         DTP*472*D8*20240105~\
         SE*18*0001~\
         GE*1*1~IEA*1*000000001~"
    )
}
