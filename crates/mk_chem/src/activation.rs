use crate::ReactionType;

/// Tabulated activation energies in kJ/mol for well-studied combinations,
/// keyed by (reaction type, substrate, nucleophile). Identities are
/// matched case-insensitively.
const ACTIVATION_ENERGIES: &[(ReactionType, &str, &str, f64)] = &[
    (ReactionType::Sn2, "CH3BR", "OH-", 80.0),
    (ReactionType::Sn2, "CH3BR", "CN-", 75.0),
    (ReactionType::Sn2, "CH3BR", "I-", 70.0),
    (ReactionType::Sn2, "CH3CL", "OH-", 95.0),
    (ReactionType::Sn2, "CH3I", "OH-", 72.0),
    (ReactionType::Sn2, "C2H5BR", "OH-", 89.0),
    (ReactionType::Sn2, "C2H5BR", "CH3O-", 85.0),
    (ReactionType::Sn1, "(CH3)3CBR", "H2O", 84.0),
    (ReactionType::Sn1, "(CH3)3CCL", "H2O", 97.0),
    (ReactionType::E2, "C2H5BR", "OH-", 92.0),
    (ReactionType::E2, "(CH3)2CHBR", "CH3O-", 88.0),
    (ReactionType::E1, "(CH3)3CBR", "H2O", 101.0),
];

/// Multiplier on the base activation energy reflecting leaving-group
/// ability. Iodide leaves easily, chloride reluctantly.
fn leaving_group_factor(substrate: &str) -> f64 {
    let key = substrate.to_ascii_uppercase();
    if key.ends_with('I') {
        0.85
    } else if key.ends_with("BR") {
        0.95
    } else if key.ends_with("CL") {
        1.05
    } else {
        1.0
    }
}

/// Multiplier reflecting nucleophile strength. Only bimolecular
/// mechanisms are sensitive to it; SN1/E1 rates are set by ionization.
fn nucleophile_factor(nucleophile: &str, reaction_type: ReactionType) -> f64 {
    if !reaction_type.is_bimolecular() {
        return 1.0;
    }
    match nucleophile.to_ascii_uppercase().as_str() {
        "CN-" | "SH-" | "I-" => 0.90,
        "OH-" | "CH3O-" => 0.95,
        "H2O" | "NH3" => 1.10,
        _ => 1.0,
    }
}

/// Activation energy in kJ/mol for a substrate/nucleophile pair under a
/// given mechanism.
///
/// Returns the tabulated value when one exists; otherwise the reaction
/// type's base barrier adjusted by leaving-group and nucleophile-strength
/// heuristics. Never fails for unknown identities.
pub fn activation_energy(substrate: &str, nucleophile: &str, reaction_type: ReactionType) -> f64 {
    let skey = substrate.to_ascii_uppercase();
    let nkey = nucleophile.to_ascii_uppercase();

    for (rt, sub, nuc, ea) in ACTIVATION_ENERGIES {
        if *rt == reaction_type && *sub == skey && *nuc == nkey {
            return *ea;
        }
    }

    reaction_type.base_activation_energy()
        * leaving_group_factor(substrate)
        * nucleophile_factor(nucleophile, reaction_type)
}
