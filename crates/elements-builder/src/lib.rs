//! Generates the JSON element table that `chemform` embeds as its default

use std::{
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

// External Crate Imports
use chemform::ElementRecord;
use miette::Diagnostic;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, info};

pub const PUBCHEM_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/ptable/atomic-mass/";
pub const RSC_URL: &str = "https://periodic-table.rsc.org/";

/// Elements whose atomic masses were taken from the Royal Society of Chemistry rather than from PubChem
pub const ALTERNATE_SOURCE_ELEMENTS: [&str; 19] = [
    "Li", "Ar", "Zn", "Se", "Br", "Kr", "Ru", "Cd", "Ba", "Nd", "Sm", "Er", "Yb", "Hf", "Os", "Ir", "Pt", "Hg", "Pb",
];

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Group {
    Actinide,
    AlkaliMetal,
    AlkalineEarthMetal,
    Halogen,
    Lanthanide,
    Metalloid,
    NobleGas,
    Nonmetal,
    PosttransitionMetal,
    TransitionMetal,
    Unknown,
}

#[derive(Debug, Diagnostic, Error)]
pub enum BuildError {
    #[diagnostic(help("check that the parent directory exists and that you can write to it"))]
    #[error("failed to write the element table to {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize the element table")]
    Json(#[from] serde_json::Error),

    #[error("the serialized element table is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

// NOTE: Atomic numbers aren't listed, they're taken from each element's position in this list
#[rustfmt::skip]
const ELEMENTS: [(&str, &str, Decimal, Group); 118] = {
    use Group::*;
    [
    ("Hydrogen", "H", dec!(1.008), Nonmetal),
    ("Helium", "He", dec!(4.0026), NobleGas),
    ("Lithium", "Li", dec!(6.941), AlkaliMetal),
    ("Beryllium", "Be", dec!(9.012183), AlkalineEarthMetal),
    ("Boron", "B", dec!(10.81), Metalloid),
    ("Carbon", "C", dec!(12.011), Nonmetal),
    ("Nitrogen", "N", dec!(14.007), Nonmetal),
    ("Oxygen", "O", dec!(15.999), Nonmetal),
    ("Fluorine", "F", dec!(18.99840316), Halogen),
    ("Neon", "Ne", dec!(20.18), NobleGas),
    ("Sodium", "Na", dec!(22.9897693), AlkaliMetal),
    ("Magnesium", "Mg", dec!(24.305), AlkalineEarthMetal),
    ("Aluminium", "Al", dec!(26.981538), PosttransitionMetal),
    ("Silicon", "Si", dec!(28.085), Metalloid),
    ("Phosphorus", "P", dec!(30.97376200), Nonmetal),
    ("Sulfur", "S", dec!(32.065), Nonmetal),
    ("Chlorine", "Cl", dec!(35.45), Halogen),
    ("Argon", "Ar", dec!(39.95), NobleGas),
    ("Potassium", "K", dec!(39.0983), AlkaliMetal),
    ("Calcium", "Ca", dec!(40.08), AlkalineEarthMetal),
    ("Scandium", "Sc", dec!(44.95591), TransitionMetal),
    ("Titanium", "Ti", dec!(47.867), TransitionMetal),
    ("Vanadium", "V", dec!(50.9415), TransitionMetal),
    ("Chromium", "Cr", dec!(51.996), TransitionMetal),
    ("Manganese", "Mn", dec!(54.93804), TransitionMetal),
    ("Iron", "Fe", dec!(55.84), TransitionMetal),
    ("Cobalt", "Co", dec!(58.93319), TransitionMetal),
    ("Nickel", "Ni", dec!(58.693), TransitionMetal),
    ("Copper", "Cu", dec!(63.55), TransitionMetal),
    ("Zinc", "Zn", dec!(65.38), TransitionMetal),
    ("Gallium", "Ga", dec!(69.723), PosttransitionMetal),
    ("Germanium", "Ge", dec!(72.63), Metalloid),
    ("Arsenic", "As", dec!(74.92159), Metalloid),
    ("Selenium", "Se", dec!(78.971), Nonmetal),
    ("Bromine", "Br", dec!(79.904), Halogen),
    ("Krypton", "Kr", dec!(83.798), NobleGas),
    ("Rubidium", "Rb", dec!(85.468), AlkaliMetal),
    ("Strontium", "Sr", dec!(87.62), AlkalineEarthMetal),
    ("Yttrium", "Y", dec!(88.90584), TransitionMetal),
    ("Zirconium", "Zr", dec!(91.22), TransitionMetal),
    ("Niobium", "Nb", dec!(92.90637), TransitionMetal),
    ("Molybdenum", "Mo", dec!(95.95), TransitionMetal),
    ("Technetium", "Tc", dec!(96.90636), TransitionMetal),
    ("Ruthenium", "Ru", dec!(101.07), TransitionMetal),
    ("Rhodium", "Rh", dec!(102.9055), TransitionMetal),
    ("Palladium", "Pd", dec!(106.42), TransitionMetal),
    ("Silver", "Ag", dec!(107.868), TransitionMetal),
    ("Cadmium", "Cd", dec!(112.414), TransitionMetal),
    ("Indium", "In", dec!(114.818), PosttransitionMetal),
    ("Tin", "Sn", dec!(118.71), PosttransitionMetal),
    ("Antimony", "Sb", dec!(121.760), Metalloid),
    ("Tellurium", "Te", dec!(127.6), Metalloid),
    ("Iodine", "I", dec!(126.9045), Halogen),
    ("Xenon", "Xe", dec!(131.29), NobleGas),
    ("Cesium", "Cs", dec!(132.9054520), AlkaliMetal),
    ("Barium", "Ba", dec!(137.327), AlkalineEarthMetal),
    ("Lanthanum", "La", dec!(138.9055), Lanthanide),
    ("Cerium", "Ce", dec!(140.116), Lanthanide),
    ("Praseodymium", "Pr", dec!(140.90766), Lanthanide),
    ("Neodymium", "Nd", dec!(144.242), Lanthanide),
    ("Promethium", "Pm", dec!(144.91276), Lanthanide),
    ("Samarium", "Sm", dec!(150.36), Lanthanide),
    ("Europium", "Eu", dec!(151.964), Lanthanide),
    ("Gadolinium", "Gd", dec!(157.25), Lanthanide),
    ("Terbium", "Tb", dec!(158.92535), Lanthanide),
    ("Dysprosium", "Dy", dec!(162.500), Lanthanide),
    ("Holmium", "Ho", dec!(164.93033), Lanthanide),
    ("Erbium", "Er", dec!(167.259), Lanthanide),
    ("Thulium", "Tm", dec!(168.93422), Lanthanide),
    ("Ytterbium", "Yb", dec!(173.045), Lanthanide),
    ("Lutetium", "Lu", dec!(174.9667), Lanthanide),
    ("Hafnium", "Hf", dec!(178.486), TransitionMetal),
    ("Tantalum", "Ta", dec!(180.9479), TransitionMetal),
    ("Tungsten", "W", dec!(183.84), TransitionMetal),
    ("Rhenium", "Re", dec!(186.207), TransitionMetal),
    ("Osmium", "Os", dec!(190.23), TransitionMetal),
    ("Iridium", "Ir", dec!(192.217), TransitionMetal),
    ("Platinum", "Pt", dec!(195.084), TransitionMetal),
    ("Gold", "Au", dec!(196.96657), TransitionMetal),
    ("Mercury", "Hg", dec!(200.592), TransitionMetal),
    ("Thallium", "Tl", dec!(204.383), PosttransitionMetal),
    ("Lead", "Pb", dec!(207.2), PosttransitionMetal),
    ("Bismuth", "Bi", dec!(208.98040), PosttransitionMetal),
    ("Polonium", "Po", dec!(208.98243), Metalloid),
    ("Astatine", "At", dec!(209.98715), Halogen),
    ("Radon", "Rn", dec!(222.01758), NobleGas),
    ("Francium", "Fr", dec!(223.01973), AlkaliMetal),
    ("Radium", "Ra", dec!(226.02541), AlkalineEarthMetal),
    ("Actinium", "Ac", dec!(227.02775), Actinide),
    ("Thorium", "Th", dec!(232.038), Actinide),
    ("Protactinium", "Pa", dec!(231.03588), Actinide),
    ("Uranium", "U", dec!(238.0289), Actinide),
    ("Neptunium", "Np", dec!(237.048172), Actinide),
    ("Plutonium", "Pu", dec!(244.06420), Actinide),
    ("Americium", "Am", dec!(243.061380), Actinide),
    ("Curium", "Cm", dec!(247.07035), Actinide),
    ("Berkelium", "Bk", dec!(247.07031), Actinide),
    ("Californium", "Cf", dec!(251.07959), Actinide),
    ("Einsteinium", "Es", dec!(252.0830), Actinide),
    ("Fermium", "Fm", dec!(257.09511), Actinide),
    ("Mendelevium", "Md", dec!(258.09843), Actinide),
    ("Nobelium", "No", dec!(259.10100), Actinide),
    ("Lawrencium", "Lr", dec!(266.120), Actinide),
    ("Rutherfordium", "Rf", dec!(267.122), TransitionMetal),
    ("Dubnium", "Db", dec!(268.126), TransitionMetal),
    ("Seaborgium", "Sg", dec!(269.128), TransitionMetal),
    ("Bohrium", "Bh", dec!(270.133), TransitionMetal),
    ("Hassium", "Hs", dec!(269.1336), TransitionMetal),
    ("Meitnerium", "Mt", dec!(277.154), Unknown),
    ("Darmstadtium", "Ds", dec!(282.166), Unknown),
    ("Roentgenium", "Rg", dec!(282.169), Unknown),
    ("Copernicium", "Cn", dec!(286.179), TransitionMetal),
    ("Nihonium", "Nh", dec!(286.182), PosttransitionMetal),
    ("Flerovium", "Fl", dec!(290.192), PosttransitionMetal),
    ("Moscovium", "Mc", dec!(290.196), PosttransitionMetal),
    ("Livermorium", "Lv", dec!(293.205), PosttransitionMetal),
    ("Tennessine", "Ts", dec!(294.211), Halogen),
    ("Oganesson", "Og", dec!(295.216), NobleGas),
    ]
};

// Public API ==========================================================================================================

/// Every element, in order of atomic number, ready to be serialized
#[must_use]
pub fn records() -> Vec<ElementRecord> {
    ELEMENTS
        .iter()
        .zip(1..)
        .map(|(&(name, symbol, atomic_mass, group), atomic_number)| ElementRecord {
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            atomic_number,
            atomic_mass,
            group: group.to_string(),
            source: source(symbol).to_owned(),
        })
        .collect()
}

/// Serializes `records` as a JSON array, indented by four spaces
///
/// # Errors
///
/// Returns a [`BuildError`] if `serde_json` fails, or if its output isn't valid UTF-8
pub fn to_json(records: &[ElementRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// Writes the full element table to `path`, returning the number of elements written
///
/// # Errors
///
/// Fails if the file can't be written
pub fn write_json(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let records = records();
    let json = to_json(&records)?;
    debug!(bytes = json.len(), "serialized element table");

    fs::write(path, json).map_err(|source| BuildError::Io {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path.display(), elements = records.len(), "wrote element table");
    Ok(records.len())
}

/// Where the atomic mass of `symbol` was sourced from
#[must_use]
pub fn source(symbol: &str) -> &'static str {
    if ALTERNATE_SOURCE_ELEMENTS.contains(&symbol) {
        RSC_URL
    } else {
        PUBCHEM_URL
    }
}

impl Group {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Actinide => "Actinide",
            Self::AlkaliMetal => "Alkali Metal",
            Self::AlkalineEarthMetal => "Alkaline Earth Metal",
            Self::Halogen => "Halogen",
            Self::Lanthanide => "Lanthanide",
            Self::Metalloid => "Metalloid",
            Self::NobleGas => "Noble Gas",
            Self::Nonmetal => "Nonmetal",
            Self::PosttransitionMetal => "Post-transition Metal",
            Self::TransitionMetal => "Transition Metal",
            Self::Unknown => "Unknown",
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Module Tests ========================================================================================================
