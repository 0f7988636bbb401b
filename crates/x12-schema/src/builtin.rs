//! Built-in transaction schemas
//!
//! Declarative tables for the HIPAA 5010 transactions this engine ships
//! with, plus the 850 purchase order and the 997/999 acknowledgment
//! framings. HL, NM1, CLM, and LX loop boundaries are expressed as triggers
//! with qualifier constraints so the builder needs no transaction-specific
//! code.

use crate::model::{
    DataType, ElementRule, LoopSchema, LoopTrigger, SchemaNode, SegmentSchema, TransactionSchema,
};

/// All schemas registered by `SchemaRegistry::with_builtin`.
#[must_use]
pub fn builtin_schemas() -> Vec<TransactionSchema> {
    vec![
        schema_837p(),
        schema_835(),
        schema_270(),
        schema_850(),
        schema_997(),
        schema_999(),
    ]
}

fn seg(node: SegmentSchema) -> SchemaNode {
    SchemaNode::Segment(node)
}

fn lp(node: LoopSchema) -> SchemaNode {
    SchemaNode::Loop(node)
}

fn hl_segment() -> SegmentSchema {
    SegmentSchema::new("HL", "Hierarchical Level")
        .mandatory()
        .with_elements(vec![
            ElementRule::new(1, "Hierarchical ID Number")
                .typed(DataType::Integer)
                .length(1, 12)
                .required(),
            ElementRule::new(2, "Hierarchical Parent ID")
                .typed(DataType::Integer)
                .length(1, 12),
            ElementRule::new(3, "Hierarchical Level Code").required().length(1, 2),
            ElementRule::new(4, "Hierarchical Child Code").length(1, 1),
        ])
}

fn nm1_segment() -> SegmentSchema {
    SegmentSchema::new("NM1", "Individual or Organizational Name")
        .mandatory()
        .with_elements(vec![
            ElementRule::new(1, "Entity Identifier Code")
                .typed(DataType::Id)
                .length(2, 3)
                .required()
                .codes("entity_identifier"),
            ElementRule::new(2, "Entity Type Qualifier")
                .typed(DataType::Id)
                .length(1, 1)
                .required(),
            ElementRule::new(3, "Name Last or Organization Name").length(1, 60),
            ElementRule::new(8, "Identification Code Qualifier")
                .typed(DataType::Id)
                .length(1, 2),
            ElementRule::new(9, "Identification Code").length(2, 80),
        ])
}

fn address_segments() -> Vec<SchemaNode> {
    vec![
        seg(SegmentSchema::new("N3", "Address Information").with_elements(vec![
            ElementRule::new(1, "Address Line 1").length(1, 55).required(),
            ElementRule::new(2, "Address Line 2").length(1, 55),
        ])),
        seg(SegmentSchema::new("N4", "Geographic Location").with_elements(vec![
            ElementRule::new(1, "City Name").length(2, 30),
            ElementRule::new(2, "State Code").length(2, 2),
            ElementRule::new(3, "Postal Code").length(3, 15),
        ])),
    ]
}

fn ref_segment() -> SegmentSchema {
    SegmentSchema::new("REF", "Reference Identification")
        .repeats(None)
        .with_elements(vec![
            ElementRule::new(1, "Reference Identification Qualifier")
                .typed(DataType::Id)
                .length(2, 3)
                .required()
                .codes("reference_qualifier"),
            ElementRule::new(2, "Reference Identification").length(1, 50).required(),
        ])
}

fn dtp_segment() -> SegmentSchema {
    SegmentSchema::new("DTP", "Date or Time Period")
        .repeats(None)
        .with_elements(vec![
            ElementRule::new(1, "Date/Time Qualifier")
                .typed(DataType::Id)
                .length(3, 3)
                .required(),
            ElementRule::new(2, "Date Time Period Format Qualifier")
                .typed(DataType::Id)
                .length(2, 3)
                .required(),
            ElementRule::new(3, "Date Time Period").length(1, 35).required(),
        ])
}

/// Claim loop 2300 with nested 2310 providers and 2400 service lines.
/// Shared between the subscriber (2000B) and patient (2000C) levels.
fn claim_loop() -> LoopSchema {
    LoopSchema::new("2300", "Claim Information", LoopTrigger::on("CLM")).with_children(vec![
        seg(SegmentSchema::new("CLM", "Claim Information")
            .mandatory()
            .with_elements(vec![
                ElementRule::new(1, "Claim Submitter Identifier").length(1, 38).required(),
                ElementRule::new(2, "Total Claim Charge Amount")
                    .typed(DataType::Decimal)
                    .length(1, 18)
                    .required(),
                ElementRule::new(5, "Health Care Service Location").length(1, 30).required(),
            ])),
        seg(dtp_segment()),
        seg(ref_segment()),
        seg(SegmentSchema::new("HI", "Health Care Diagnosis Code")
            .repeats(None)
            .with_elements(vec![ElementRule::new(1, "Health Care Code Information")
                .length(1, 30)
                .required()])),
        lp(
            LoopSchema::new(
                "2310A",
                "Rendering Provider",
                LoopTrigger::on("NM1").qualified(1, vec!["82"]),
            )
            .with_children(vec![
                seg(nm1_segment()),
                seg(SegmentSchema::new("PRV", "Provider Information")),
                seg(ref_segment()),
            ]),
        ),
        lp(
            LoopSchema::new(
                "2310C",
                "Service Facility Location",
                LoopTrigger::on("NM1").qualified(1, vec!["77"]),
            )
            .with_children({
                let mut children = vec![seg(nm1_segment())];
                children.extend(address_segments());
                children
            }),
        ),
        lp(
            LoopSchema::new("2400", "Service Line", LoopTrigger::on("LX")).with_children(vec![
                seg(SegmentSchema::new("LX", "Service Line Number")
                    .mandatory()
                    .with_elements(vec![ElementRule::new(1, "Assigned Number")
                        .typed(DataType::Integer)
                        .length(1, 6)
                        .required()])),
                seg(SegmentSchema::new("SV1", "Professional Service")
                    .mandatory()
                    .with_elements(vec![
                        ElementRule::new(1, "Composite Medical Procedure Identifier")
                            .length(1, 48)
                            .required(),
                        ElementRule::new(2, "Line Item Charge Amount")
                            .typed(DataType::Decimal)
                            .length(1, 18)
                            .required(),
                        ElementRule::new(4, "Service Unit Count")
                            .typed(DataType::Decimal)
                            .length(1, 15),
                    ])),
                seg(dtp_segment()),
                seg(ref_segment()),
            ]),
        ),
    ])
}

/// 837 Professional, 005010X222A1.
#[must_use]
pub fn schema_837p() -> TransactionSchema {
    TransactionSchema::new("837", "005010X222A1", "Health Care Claim: Professional", "HC")
        .with_nodes(vec![
            seg(SegmentSchema::new("BHT", "Beginning of Hierarchical Transaction")
                .mandatory()
                .with_elements(vec![
                    ElementRule::new(1, "Hierarchical Structure Code")
                        .typed(DataType::Id)
                        .length(4, 4)
                        .required(),
                    ElementRule::new(2, "Transaction Set Purpose Code")
                        .typed(DataType::Id)
                        .length(2, 2)
                        .required(),
                    ElementRule::new(4, "Transaction Set Creation Date").typed(DataType::Date).length(8, 8),
                    ElementRule::new(5, "Transaction Set Creation Time").typed(DataType::Time).length(4, 8),
                ])),
            lp(
                LoopSchema::new("1000A", "Submitter Name", LoopTrigger::on("NM1").qualified(1, vec!["41"]))
                    .mandatory()
                    .with_children(vec![
                        seg(nm1_segment()),
                        seg(SegmentSchema::new("PER", "Administrative Communications Contact")),
                    ]),
            ),
            lp(
                LoopSchema::new("1000B", "Receiver Name", LoopTrigger::on("NM1").qualified(1, vec!["40"]))
                    .mandatory()
                    .with_children(vec![seg(nm1_segment())]),
            ),
            lp(
                LoopSchema::new(
                    "2000A",
                    "Billing Provider Hierarchical Level",
                    LoopTrigger::on("HL").qualified(3, vec!["20"]),
                )
                .mandatory()
                .with_children(vec![
                    seg(hl_segment()),
                    seg(SegmentSchema::new("PRV", "Billing Provider Specialty")),
                    lp(
                        LoopSchema::new(
                            "2010AA",
                            "Billing Provider Name",
                            LoopTrigger::on("NM1").qualified(1, vec!["85"]),
                        )
                        .mandatory()
                        .with_children({
                            let mut children = vec![seg(nm1_segment())];
                            children.extend(address_segments());
                            children.push(seg(ref_segment()));
                            children.push(seg(SegmentSchema::new(
                                "PER",
                                "Billing Provider Contact",
                            )));
                            children
                        }),
                    ),
                    lp(
                        LoopSchema::new(
                            "2010AB",
                            "Pay-to Address",
                            LoopTrigger::on("NM1").qualified(1, vec!["87"]),
                        )
                        .with_children({
                            let mut children = vec![seg(nm1_segment())];
                            children.extend(address_segments());
                            children
                        }),
                    ),
                ]),
            ),
            lp(
                LoopSchema::new(
                    "2000B",
                    "Subscriber Hierarchical Level",
                    LoopTrigger::on("HL").qualified(3, vec!["22"]),
                )
                .mandatory()
                .with_children(vec![
                    seg(hl_segment()),
                    seg(SegmentSchema::new("SBR", "Subscriber Information")
                        .mandatory()
                        .with_elements(vec![
                            ElementRule::new(1, "Payer Responsibility Sequence")
                                .typed(DataType::Id)
                                .length(1, 1)
                                .required(),
                            ElementRule::new(9, "Claim Filing Indicator Code")
                                .typed(DataType::Id)
                                .length(1, 2)
                                .codes("claim_filing_indicator"),
                        ])),
                    lp(
                        LoopSchema::new(
                            "2010BA",
                            "Subscriber Name",
                            LoopTrigger::on("NM1").qualified(1, vec!["IL"]),
                        )
                        .mandatory()
                        .with_children({
                            let mut children = vec![seg(nm1_segment())];
                            children.extend(address_segments());
                            children.push(seg(SegmentSchema::new("DMG", "Demographic Information")));
                            children.push(seg(ref_segment()));
                            children
                        }),
                    ),
                    lp(
                        LoopSchema::new(
                            "2010BB",
                            "Payer Name",
                            LoopTrigger::on("NM1").qualified(1, vec!["PR"]),
                        )
                        .with_children({
                            let mut children = vec![seg(nm1_segment())];
                            children.extend(address_segments());
                            children.push(seg(ref_segment()));
                            children
                        }),
                    ),
                    lp(claim_loop()),
                ]),
            ),
            lp(
                LoopSchema::new(
                    "2000C",
                    "Patient Hierarchical Level",
                    LoopTrigger::on("HL").qualified(3, vec!["23"]),
                )
                .with_children(vec![
                    seg(hl_segment()),
                    seg(SegmentSchema::new("PAT", "Patient Information")),
                    lp(
                        LoopSchema::new(
                            "2010CA",
                            "Patient Name",
                            LoopTrigger::on("NM1").qualified(1, vec!["QC"]),
                        )
                        .mandatory()
                        .with_children({
                            let mut children = vec![seg(nm1_segment())];
                            children.extend(address_segments());
                            children.push(seg(SegmentSchema::new("DMG", "Demographic Information")));
                            children
                        }),
                    ),
                    lp(claim_loop()),
                ]),
            ),
        ])
}

/// 835 Health Care Claim Payment/Advice, 005010X221A1.
#[must_use]
pub fn schema_835() -> TransactionSchema {
    TransactionSchema::new("835", "005010X221A1", "Health Care Claim Payment/Advice", "HP")
        .with_nodes(vec![
            seg(SegmentSchema::new("BPR", "Financial Information")
                .mandatory()
                .with_elements(vec![
                    ElementRule::new(1, "Transaction Handling Code")
                        .typed(DataType::Id)
                        .length(1, 2)
                        .required(),
                    ElementRule::new(2, "Total Actual Provider Payment Amount")
                        .typed(DataType::Decimal)
                        .length(1, 18)
                        .required(),
                ])),
            seg(SegmentSchema::new("TRN", "Reassociation Trace Number").with_elements(vec![
                ElementRule::new(1, "Trace Type Code").typed(DataType::Id).length(1, 2).required(),
                ElementRule::new(2, "Check or EFT Trace Number").length(1, 50).required(),
            ])),
            seg(ref_segment()),
            seg(SegmentSchema::new("DTM", "Production Date").with_elements(vec![
                ElementRule::new(1, "Date/Time Qualifier").typed(DataType::Id).length(3, 3).required(),
                ElementRule::new(2, "Date").typed(DataType::Date).length(8, 8),
            ])),
            lp(
                LoopSchema::new("1000A", "Payer Identification", LoopTrigger::on("N1").qualified(1, vec!["PR"]))
                    .mandatory()
                    .with_children({
                        let mut children = vec![seg(SegmentSchema::new("N1", "Party Identification")
                            .mandatory()
                            .with_elements(vec![
                                ElementRule::new(1, "Entity Identifier Code")
                                    .typed(DataType::Id)
                                    .length(2, 3)
                                    .required(),
                                ElementRule::new(2, "Name").length(1, 60),
                            ]))];
                        children.extend(address_segments());
                        children.push(seg(SegmentSchema::new("PER", "Payer Contact Information")));
                        children
                    }),
            ),
            lp(
                LoopSchema::new("1000B", "Payee Identification", LoopTrigger::on("N1").qualified(1, vec!["PE"]))
                    .mandatory()
                    .with_children({
                        let mut children = vec![seg(SegmentSchema::new("N1", "Party Identification")
                            .mandatory()
                            .with_elements(vec![
                                ElementRule::new(1, "Entity Identifier Code")
                                    .typed(DataType::Id)
                                    .length(2, 3)
                                    .required(),
                                ElementRule::new(2, "Name").length(1, 60),
                                ElementRule::new(4, "Payee Identification Code").length(2, 80),
                            ]))];
                        children.extend(address_segments());
                        children.push(seg(ref_segment()));
                        children
                    }),
            ),
            lp(
                LoopSchema::new("2000", "Header Number", LoopTrigger::on("LX")).with_children(vec![
                    seg(SegmentSchema::new("LX", "Header Number")
                        .mandatory()
                        .with_elements(vec![ElementRule::new(1, "Assigned Number")
                            .typed(DataType::Integer)
                            .length(1, 6)
                            .required()])),
                    lp(
                        LoopSchema::new("2100", "Claim Payment Information", LoopTrigger::on("CLP"))
                            .with_children(vec![
                                seg(SegmentSchema::new("CLP", "Claim Payment Information")
                                    .mandatory()
                                    .with_elements(vec![
                                        ElementRule::new(1, "Patient Control Number")
                                            .length(1, 38)
                                            .required(),
                                        ElementRule::new(2, "Claim Status Code")
                                            .typed(DataType::Id)
                                            .length(1, 2)
                                            .required()
                                            .codes("claim_status"),
                                        ElementRule::new(3, "Total Claim Charge Amount")
                                            .typed(DataType::Decimal)
                                            .length(1, 18)
                                            .required(),
                                        ElementRule::new(4, "Claim Payment Amount")
                                            .typed(DataType::Decimal)
                                            .length(1, 18)
                                            .required(),
                                    ])),
                                seg(SegmentSchema::new("CAS", "Claim Adjustment").repeats(None)),
                                seg(nm1_segment()),
                                seg(SegmentSchema::new("DTM", "Claim Date").repeats(None)),
                                lp(
                                    LoopSchema::new(
                                        "2110",
                                        "Service Payment Information",
                                        LoopTrigger::on("SVC"),
                                    )
                                    .with_children(vec![
                                        seg(SegmentSchema::new("SVC", "Service Payment Information")
                                            .mandatory()
                                            .with_elements(vec![
                                                ElementRule::new(1, "Composite Medical Procedure")
                                                    .length(1, 48)
                                                    .required(),
                                                ElementRule::new(2, "Line Item Charge Amount")
                                                    .typed(DataType::Decimal)
                                                    .length(1, 18)
                                                    .required(),
                                                ElementRule::new(3, "Line Item Payment Amount")
                                                    .typed(DataType::Decimal)
                                                    .length(1, 18)
                                                    .required(),
                                            ])),
                                        seg(SegmentSchema::new("DTM", "Service Date").repeats(None)),
                                        seg(SegmentSchema::new("CAS", "Service Adjustment").repeats(None)),
                                        seg(SegmentSchema::new("AMT", "Service Supplemental Amount")
                                            .repeats(None)),
                                    ]),
                                ),
                            ]),
                    ),
                ]),
            ),
        ])
}

/// 270 Eligibility, Coverage or Benefit Inquiry, 005010X279A1.
#[must_use]
pub fn schema_270() -> TransactionSchema {
    fn party_loop(id: &str, name: &str) -> LoopSchema {
        LoopSchema::new(id, name, LoopTrigger::on("NM1")).with_children({
            let mut children = vec![seg(nm1_segment()), seg(ref_segment())];
            children.extend(address_segments());
            children.push(seg(SegmentSchema::new("DMG", "Demographic Information")));
            children.push(seg(dtp_segment()));
            children.push(lp(LoopSchema::new(
                "2110",
                "Eligibility or Benefit Inquiry",
                LoopTrigger::on("EQ"),
            )
            .with_children(vec![
                seg(SegmentSchema::new("EQ", "Eligibility or Benefit Inquiry").with_elements(
                    vec![ElementRule::new(1, "Service Type Code").typed(DataType::Id).length(1, 2)],
                )),
                seg(ref_segment()),
                seg(dtp_segment()),
            ])));
            children
        })
    }

    fn hl_loop(id: &str, name: &str, level_code: &str, children: Vec<SchemaNode>) -> LoopSchema {
        let mut all = vec![seg(hl_segment())];
        all.extend(children);
        LoopSchema::new(id, name, LoopTrigger::on("HL").qualified(3, vec![level_code]))
            .with_children(all)
    }

    TransactionSchema::new("270", "005010X279A1", "Eligibility Inquiry", "HS").with_nodes(vec![
        seg(SegmentSchema::new("BHT", "Beginning of Hierarchical Transaction")
            .mandatory()
            .with_elements(vec![
                ElementRule::new(1, "Hierarchical Structure Code")
                    .typed(DataType::Id)
                    .length(4, 4)
                    .required(),
                ElementRule::new(2, "Transaction Set Purpose Code")
                    .typed(DataType::Id)
                    .length(2, 2)
                    .required(),
            ])),
        lp(hl_loop(
            "2000A",
            "Information Source Level",
            "20",
            vec![lp(party_loop("2100A", "Information Source Name"))],
        )
        .mandatory()),
        lp(hl_loop(
            "2000B",
            "Information Receiver Level",
            "21",
            vec![lp(party_loop("2100B", "Information Receiver Name"))],
        )),
        lp(hl_loop(
            "2000C",
            "Subscriber Level",
            "22",
            vec![
                seg(SegmentSchema::new("TRN", "Subscriber Trace Number").repeats(Some(2))),
                lp(party_loop("2100C", "Subscriber Name")),
            ],
        )),
        lp(hl_loop(
            "2000D",
            "Dependent Level",
            "23",
            vec![
                seg(SegmentSchema::new("TRN", "Dependent Trace Number").repeats(Some(2))),
                lp(party_loop("2100D", "Dependent Name")),
            ],
        )),
    ])
}

/// 850 Purchase Order, 004010.
#[must_use]
pub fn schema_850() -> TransactionSchema {
    TransactionSchema::new("850", "004010", "Purchase Order", "PO").with_nodes(vec![
        seg(SegmentSchema::new("BEG", "Beginning Segment for Purchase Order")
            .mandatory()
            .with_elements(vec![
                ElementRule::new(1, "Transaction Set Purpose Code")
                    .typed(DataType::Id)
                    .length(2, 2)
                    .required(),
                ElementRule::new(2, "Purchase Order Type Code")
                    .typed(DataType::Id)
                    .length(2, 2)
                    .required(),
                ElementRule::new(3, "Purchase Order Number").length(1, 22).required(),
                ElementRule::new(5, "Date").typed(DataType::Date).length(8, 8).required(),
            ])),
        seg(ref_segment()),
        seg(SegmentSchema::new("PER", "Administrative Contact")),
        seg(SegmentSchema::new("DTM", "Date/Time Reference").repeats(None).with_elements(vec![
            ElementRule::new(1, "Date/Time Qualifier").typed(DataType::Id).length(3, 3).required(),
            ElementRule::new(2, "Date").typed(DataType::Date).length(8, 8),
        ])),
        lp(
            LoopSchema::new("N1", "Party Identification", LoopTrigger::on("N1")).with_children({
                let mut children = vec![seg(SegmentSchema::new("N1", "Party Identification")
                    .mandatory()
                    .with_elements(vec![
                        ElementRule::new(1, "Entity Identifier Code")
                            .typed(DataType::Id)
                            .length(2, 3)
                            .required(),
                        ElementRule::new(2, "Name").length(1, 60),
                    ]))];
                children.extend(address_segments());
                children.push(seg(SegmentSchema::new("PER", "Party Contact")));
                children
            }),
        ),
        lp(
            LoopSchema::new("PO1", "Baseline Item Data", LoopTrigger::on("PO1"))
                .mandatory()
                .with_children(vec![
                    seg(SegmentSchema::new("PO1", "Baseline Item Data")
                        .mandatory()
                        .with_elements(vec![
                            ElementRule::new(2, "Quantity Ordered")
                                .typed(DataType::Decimal)
                                .length(1, 15)
                                .required(),
                            ElementRule::new(3, "Unit of Measure Code")
                                .typed(DataType::Id)
                                .length(2, 2)
                                .required(),
                            ElementRule::new(4, "Unit Price").typed(DataType::Decimal).length(1, 17),
                        ])),
                    seg(SegmentSchema::new("PID", "Product/Item Description").repeats(None)),
                    seg(SegmentSchema::new("SCH", "Line Item Schedule").repeats(None)),
                ]),
        ),
        seg(SegmentSchema::new("CTT", "Transaction Totals").with_elements(vec![
            ElementRule::new(1, "Number of Line Items")
                .typed(DataType::Integer)
                .length(1, 6)
                .required(),
        ])),
    ])
}

/// 997 Functional Acknowledgment framing, 005010.
#[must_use]
pub fn schema_997() -> TransactionSchema {
    TransactionSchema::new("997", "005010", "Functional Acknowledgment", "FA").with_nodes(vec![
        seg(SegmentSchema::new("AK1", "Functional Group Response Header")
            .mandatory()
            .with_elements(vec![
                ElementRule::new(1, "Functional Identifier Code")
                    .typed(DataType::Id)
                    .length(2, 2)
                    .required(),
                ElementRule::new(2, "Group Control Number")
                    .typed(DataType::Integer)
                    .length(1, 9)
                    .required(),
            ])),
        lp(
            LoopSchema::new("AK2", "Transaction Set Response", LoopTrigger::on("AK2"))
                .with_children(vec![
                    seg(SegmentSchema::new("AK2", "Transaction Set Response Header")
                        .mandatory()
                        .with_elements(vec![
                            ElementRule::new(1, "Transaction Set Identifier Code")
                                .typed(DataType::Id)
                                .length(3, 3)
                                .required(),
                            ElementRule::new(2, "Transaction Set Control Number")
                                .length(4, 9)
                                .required(),
                        ])),
                    lp(
                        LoopSchema::new("AK3", "Data Segment Note", LoopTrigger::on("AK3"))
                            .with_children(vec![
                                seg(SegmentSchema::new("AK3", "Data Segment Note").mandatory()),
                                seg(SegmentSchema::new("AK4", "Data Element Note").repeats(None)),
                            ]),
                    ),
                    seg(SegmentSchema::new("AK5", "Transaction Set Response Trailer")
                        .mandatory()
                        .with_elements(vec![ElementRule::new(1, "Transaction Set Acknowledgment Code")
                            .typed(DataType::Id)
                            .length(1, 1)
                            .required()])),
                ]),
        ),
        seg(SegmentSchema::new("AK9", "Functional Group Response Trailer")
            .mandatory()
            .with_elements(vec![
                ElementRule::new(1, "Functional Group Acknowledge Code")
                    .typed(DataType::Id)
                    .length(1, 1)
                    .required(),
                ElementRule::new(2, "Number of Transaction Sets Included")
                    .typed(DataType::Integer)
                    .length(1, 6)
                    .required(),
                ElementRule::new(3, "Number of Received Transaction Sets")
                    .typed(DataType::Integer)
                    .length(1, 6)
                    .required(),
                ElementRule::new(4, "Number of Accepted Transaction Sets")
                    .typed(DataType::Integer)
                    .length(1, 6)
                    .required(),
            ])),
    ])
}

/// 999 Implementation Acknowledgment framing, 005010X231A1.
#[must_use]
pub fn schema_999() -> TransactionSchema {
    TransactionSchema::new("999", "005010X231A1", "Implementation Acknowledgment", "FA")
        .with_nodes(vec![
            seg(SegmentSchema::new("AK1", "Functional Group Response Header")
                .mandatory()
                .with_elements(vec![
                    ElementRule::new(1, "Functional Identifier Code")
                        .typed(DataType::Id)
                        .length(2, 2)
                        .required(),
                    ElementRule::new(2, "Group Control Number")
                        .typed(DataType::Integer)
                        .length(1, 9)
                        .required(),
                    ElementRule::new(3, "Version Identifier").length(1, 12),
                ])),
            lp(
                LoopSchema::new("2000", "Transaction Set Response", LoopTrigger::on("AK2"))
                    .with_children(vec![
                        seg(SegmentSchema::new("AK2", "Transaction Set Response Header")
                            .mandatory()),
                        lp(
                            LoopSchema::new("2100", "Error Identification", LoopTrigger::on("IK3"))
                                .with_children(vec![
                                    seg(SegmentSchema::new("IK3", "Error Identification")
                                        .mandatory()),
                                    seg(SegmentSchema::new("IK4", "Implementation Data Element Note")
                                        .repeats(None)),
                                ]),
                        ),
                        seg(SegmentSchema::new("IK5", "Transaction Set Response Trailer")
                            .mandatory()),
                    ]),
            ),
            seg(SegmentSchema::new("AK9", "Functional Group Response Trailer").mandatory()),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_ir::Segment;

    #[test]
    fn test_837p_loop_structure() {
        let schema = schema_837p();
        assert!(schema.find_loop("2000A").is_some());
        assert!(schema.find_loop("2010BA").is_some());
        assert!(schema.find_loop("2400").is_some());

        // 2400 nests under 2300, which appears at both hierarchy levels.
        let claim = schema.find_loop("2300").unwrap();
        assert!(claim.child_loops().any(|l| l.id == "2400"));
    }

    #[test]
    fn test_837p_hl_triggers_disambiguate_by_level_code() {
        let schema = schema_837p();
        let billing = schema.find_loop("2000A").unwrap();
        let subscriber = schema.find_loop("2000B").unwrap();

        let hl_billing = Segment::from_values("HL", vec!["1", "", "20", "1"]);
        let hl_subscriber = Segment::from_values("HL", vec!["2", "1", "22", "0"]);

        assert!(billing.trigger.matches(&hl_billing));
        assert!(!billing.trigger.matches(&hl_subscriber));
        assert!(subscriber.trigger.matches(&hl_subscriber));
    }

    #[test]
    fn test_835_payment_loops() {
        let schema = schema_835();
        assert!(schema.find_segment("BPR").is_some());
        assert!(schema.find_loop("2100").is_some());
        assert!(schema.find_loop("2110").is_some());
        let clp = schema.find_segment("CLP").unwrap();
        assert_eq!(clp.element_rule(2).unwrap().code_set.as_deref(), Some("claim_status"));
    }

    #[test]
    fn test_850_po1_loop_mandatory() {
        let schema = schema_850();
        let po1 = schema.find_loop("PO1").unwrap();
        assert_eq!(po1.min_occurs, 1);
        assert!(schema.find_segment("BEG").unwrap().element_rule(3).unwrap().required);
    }

    #[test]
    fn test_ack_schemas_frame_correctly() {
        let ack997 = schema_997();
        assert_eq!(ack997.functional_id_code, "FA");
        assert!(ack997.find_loop("AK2").is_some());

        let ack999 = schema_999();
        assert!(ack999.find_loop("2100").is_some());
        assert!(ack999.find_segment("IK4").is_some());
    }
}
