/// Periodic table data for elements 1–118.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ar = 18,
    K = 19,
    Ca = 20,
    Sc = 21,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Kr = 36,
    Rb = 37,
    Sr = 38,
    Y = 39,
    Zr = 40,
    Nb = 41,
    Mo = 42,
    Tc = 43,
    Ru = 44,
    Rh = 45,
    Pd = 46,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Sb = 51,
    Te = 52,
    I = 53,
    Xe = 54,
    Cs = 55,
    Ba = 56,
    La = 57,
    Ce = 58,
    Pr = 59,
    Nd = 60,
    Pm = 61,
    Sm = 62,
    Eu = 63,
    Gd = 64,
    Tb = 65,
    Dy = 66,
    Ho = 67,
    Er = 68,
    Tm = 69,
    Yb = 70,
    Lu = 71,
    Hf = 72,
    Ta = 73,
    W = 74,
    Re = 75,
    Os = 76,
    Ir = 77,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
    Po = 84,
    At = 85,
    Rn = 86,
    Fr = 87,
    Ra = 88,
    Ac = 89,
    Th = 90,
    Pa = 91,
    U = 92,
    Np = 93,
    Pu = 94,
    Am = 95,
    Cm = 96,
    Bk = 97,
    Cf = 98,
    Es = 99,
    Fm = 100,
    Md = 101,
    No = 102,
    Lr = 103,
    Rf = 104,
    Db = 105,
    Sg = 106,
    Bh = 107,
    Hs = 108,
    Mt = 109,
    Ds = 110,
    Rg = 111,
    Cn = 112,
    Nh = 113,
    Fl = 114,
    Mc = 115,
    Lv = 116,
    Ts = 117,
    Og = 118,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        if (1..=118).contains(&n) {
            // SAFETY: Element is repr(u8) with variants 1..=118, and we checked bounds.
            Some(unsafe { std::mem::transmute::<u8, Element>(n) })
        } else {
            None
        }
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        SYMBOLS
            .iter()
            .position(|&sym| sym == s)
            .and_then(|i| Element::from_atomic_num(i as u8 + 1))
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize - 1]
    }

    /// Standard atomic weight (CIAAW), or the mass number of the
    /// longest-lived isotope for elements without stable isotopes.
    pub fn atomic_weight(self) -> f64 {
        ATOMIC_WEIGHTS[self as usize - 1]
    }

    /// Exact mass of the most abundant isotope, in daltons.
    pub fn exact_mass(self) -> f64 {
        EXACT_MASSES[self as usize - 1]
    }

    /// Valences an uncharged atom of this element may carry. Empty for
    /// elements the valence model does not cover (metals, noble gases).
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::At => &[1],
            Element::Si | Element::Ge => &[4],
            Element::P | Element::As => &[3, 5],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Elements writable without brackets in line notation.
    pub fn is_organic_subset(self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }
}

/// Exact mass of a specific isotope, keyed by atomic number and mass
/// number. Covers the isotopes that turn up in organic linkers; anything
/// else returns None and callers fall back to the element's principal
/// isotope mass.
pub fn isotope_exact_mass(atomic_num: u8, mass_number: u16) -> Option<f64> {
    let mass = match (atomic_num, mass_number) {
        (1, 1) => 1.00782503207,
        (1, 2) => 2.01410177812,
        (1, 3) => 3.01604927791,
        (5, 10) => 10.01293695,
        (5, 11) => 11.00930536,
        (6, 12) => 12.0,
        (6, 13) => 13.00335483507,
        (6, 14) => 14.0032419884,
        (7, 14) => 14.00307400443,
        (7, 15) => 15.00010889888,
        (8, 16) => 15.99491461957,
        (8, 17) => 16.99913175650,
        (8, 18) => 17.99915961286,
        (15, 31) => 30.97376199842,
        (16, 32) => 31.9720711744,
        (16, 33) => 32.9714589098,
        (16, 34) => 33.967867004,
        (16, 36) => 35.96708071,
        (17, 35) => 34.96885268,
        (17, 37) => 36.96590260,
        (35, 79) => 78.9183376,
        (35, 81) => 80.9162897,
        _ => return None,
    };
    Some(mass)
}

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

// IUPAC CIAAW 2021 standard atomic weights.
// For radioactive elements without stable isotopes, mass number of longest-lived isotope.
static ATOMIC_WEIGHTS: [f64; 118] = [
    1.008,    // H
    4.002602, // He
    6.941,    // Li
    9.0121831,// Be
    10.81,    // B
    12.011,   // C
    14.007,   // N
    15.999,   // O
    18.998403163, // F
    20.1797,  // Ne
    22.98976928, // Na
    24.305,   // Mg
    26.9815384, // Al
    28.085,   // Si
    30.973761998, // P
    32.06,    // S
    35.45,    // Cl
    39.948,   // Ar
    39.0983,  // K
    40.078,   // Ca
    44.955908, // Sc
    47.867,   // Ti
    50.9415,  // V
    51.9961,  // Cr
    54.938043, // Mn
    55.845,   // Fe
    58.933194, // Co
    58.6934,  // Ni
    63.546,   // Cu
    65.38,    // Zn
    69.723,   // Ga
    72.630,   // Ge
    74.921595, // As
    78.971,   // Se
    79.904,   // Br
    83.798,   // Kr
    85.4678,  // Rb
    87.62,    // Sr
    88.90584, // Y
    91.224,   // Zr
    92.90637, // Nb
    95.95,    // Mo
    97.0,     // Tc (longest-lived isotope: 97)
    101.07,   // Ru
    102.90549, // Rh
    106.42,   // Pd
    107.8682, // Ag
    112.414,  // Cd
    114.818,  // In
    118.710,  // Sn
    121.760,  // Sb
    127.60,   // Te
    126.90447, // I
    131.293,  // Xe
    132.90545196, // Cs
    137.327,  // Ba
    138.90547, // La
    140.116,  // Ce
    140.90766, // Pr
    144.242,  // Nd
    145.0,    // Pm (longest-lived isotope: 145)
    150.36,   // Sm
    151.964,  // Eu
    157.25,   // Gd
    158.925354, // Tb
    162.500,  // Dy
    164.930328, // Ho
    167.259,  // Er
    168.934218, // Tm
    173.045,  // Yb
    174.9668, // Lu
    178.486,  // Hf
    180.94788, // Ta
    183.84,   // W
    186.207,  // Re
    190.23,   // Os
    192.217,  // Ir
    195.084,  // Pt
    196.966570, // Au
    200.592,  // Hg
    204.38,   // Tl
    207.2,    // Pb
    208.98040, // Bi
    209.0,    // Po (longest-lived: 209)
    210.0,    // At (longest-lived: 210)
    222.0,    // Rn (longest-lived: 222)
    223.0,    // Fr (longest-lived: 223)
    226.0,    // Ra (longest-lived: 226)
    227.0,    // Ac (longest-lived: 227)
    232.0377, // Th
    231.03588, // Pa
    238.02891, // U
    237.0,    // Np (longest-lived: 237)
    244.0,    // Pu (longest-lived: 244)
    243.0,    // Am (longest-lived: 243)
    247.0,    // Cm (longest-lived: 247)
    247.0,    // Bk (longest-lived: 247)
    251.0,    // Cf (longest-lived: 251)
    252.0,    // Es (longest-lived: 252)
    257.0,    // Fm (longest-lived: 257)
    258.0,    // Md (longest-lived: 258)
    259.0,    // No (longest-lived: 259)
    266.0,    // Lr (longest-lived: 266)
    267.0,    // Rf (longest-lived: 267)
    268.0,    // Db (longest-lived: 268)
    269.0,    // Sg (longest-lived: 269)
    270.0,    // Bh (longest-lived: 270)
    277.0,    // Hs (longest-lived: 277)
    278.0,    // Mt (longest-lived: 278)
    281.0,    // Ds (longest-lived: 281)
    282.0,    // Rg (longest-lived: 282)
    285.0,    // Cn (longest-lived: 285)
    286.0,    // Nh (longest-lived: 286)
    289.0,    // Fl (longest-lived: 289)
    290.0,    // Mc (longest-lived: 290)
    293.0,    // Lv (longest-lived: 293)
    294.0,    // Ts (longest-lived: 294)
    294.0,    // Og (longest-lived: 294)
];

// Monoisotopic exact masses (most abundant isotope), in daltons.
static EXACT_MASSES: [f64; 118] = [
    1.00782503207,   // H-1
    4.00260325413,   // He-4
    7.0160034366,    // Li-7
    9.012183065,     // Be-9
    11.00930536,     // B-11
    12.0,            // C-12
    14.00307400443,  // N-14
    15.99491461957,  // O-16
    18.99840316273,  // F-19
    19.9924401762,   // Ne-20
    22.9897692820,   // Na-23
    23.985041697,    // Mg-24
    26.98153853,     // Al-27
    27.97692653465,  // Si-28
    30.97376199842,  // P-31
    31.9720711744,   // S-32
    34.96885268,     // Cl-35
    39.9623831237,   // Ar-40
    38.9637064864,   // K-39
    39.962590863,    // Ca-40
    44.95590828,     // Sc-45
    47.94794198,     // Ti-48
    50.94395704,     // V-51
    51.94050623,     // Cr-52
    54.93804391,     // Mn-55
    55.93493633,     // Fe-56
    58.93319429,     // Co-59
    57.93534241,     // Ni-58
    62.92959772,     // Cu-63
    63.92914201,     // Zn-64
    68.9255735,      // Ga-69
    73.921177761,    // Ge-74
    74.92159457,     // As-75
    79.9165218,      // Se-80
    78.9183376,      // Br-79
    83.9114977282,   // Kr-84
    84.9117897379,   // Rb-85
    87.9056125,      // Sr-88
    88.9058403,      // Y-89
    89.9046977,      // Zr-90
    92.9063730,      // Nb-93
    97.90540482,     // Mo-98
    96.9063667,      // Tc-97
    101.9043441,     // Ru-102
    102.905498,      // Rh-103
    105.903483,      // Pd-106
    106.905092,      // Ag-107
    113.903365,      // Cd-114
    114.903878776,   // In-115
    119.902202,      // Sn-120
    120.903812,      // Sb-121
    129.906222748,   // Te-130
    126.904473,      // I-127
    131.904155086,   // Xe-132
    132.905451961,   // Cs-133
    137.905247,      // Ba-138
    138.906353,      // La-139
    139.905439,      // Ce-140
    140.907657,      // Pr-141
    141.907729,      // Nd-142
    144.912756,      // Pm-145
    151.919739,      // Sm-152
    152.921238,      // Eu-153
    157.924112,      // Gd-158
    158.925354,      // Tb-159
    163.929181,      // Dy-164
    164.930328,      // Ho-165
    165.930299,      // Er-166
    168.934218,      // Tm-169
    173.938867,      // Yb-174
    174.940777,      // Lu-175
    179.946557,      // Hf-180
    180.947999,      // Ta-181
    183.950933,      // W-184
    186.955752,      // Re-187
    191.961477,      // Os-192
    192.962942,      // Ir-193
    195.965836,      // Pt-195 (most abundant isotope of Pt)
    196.966570,      // Au-197
    201.970644,      // Hg-202
    204.974427,      // Tl-205
    207.976653,      // Pb-208
    208.980399,      // Bi-209
    208.982430,      // Po-209
    209.987148,      // At-210
    222.017578,      // Rn-222
    223.019736,      // Fr-223
    226.025410,      // Ra-226
    227.027752,      // Ac-227
    232.038055,      // Th-232
    231.035884,      // Pa-231
    238.050788,      // U-238
    237.048174,      // Np-237
    244.064205,      // Pu-244
    243.061381,      // Am-243
    247.070354,      // Cm-247
    247.070307,      // Bk-247
    251.079587,      // Cf-251
    252.082980,      // Es-252
    257.095106,      // Fm-257
    258.098431,      // Md-258
    259.101030,      // No-259
    266.120,         // Lr-266
    267.122,         // Rf-267
    268.126,         // Db-268
    269.129,         // Sg-269
    270.133,         // Bh-270
    277.150,         // Hs-277
    278.156,         // Mt-278
    281.165,         // Ds-281
    282.169,         // Rg-282
    285.177,         // Cn-285
    286.183,         // Nh-286
    289.190,         // Fl-289
    290.196,         // Mc-290
    293.205,         // Lv-293
    294.211,         // Ts-294
    294.214,         // Og-294
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        for n in 1..=118u8 {
            let elem = Element::from_atomic_num(n).unwrap();
            assert_eq!(Element::from_symbol(elem.symbol()), Some(elem));
            assert_eq!(elem.atomic_num(), n);
        }
    }

    #[test]
    fn from_atomic_num_bounds() {
        assert_eq!(Element::from_atomic_num(0), None);
        assert_eq!(Element::from_atomic_num(119), None);
        assert_eq!(Element::from_atomic_num(1), Some(Element::H));
        assert_eq!(Element::from_atomic_num(118), Some(Element::Og));
    }

    #[test]
    fn from_symbol_unknown() {
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Element::from_symbol(""), None);
        assert_eq!(Element::from_symbol("c"), None);
    }

    #[test]
    fn two_letter_symbols() {
        assert_eq!(Element::from_symbol("Cl"), Some(Element::Cl));
        assert_eq!(Element::from_symbol("Br"), Some(Element::Br));
        assert_eq!(Element::from_symbol("Na"), Some(Element::Na));
    }

    #[test]
    fn carbon_masses() {
        assert!((Element::C.atomic_weight() - 12.011).abs() < 1e-9);
        assert!((Element::C.exact_mass() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn default_valences_cover_linker_elements() {
        assert_eq!(Element::C.default_valences(), &[4]);
        assert_eq!(Element::O.default_valences(), &[2]);
        assert_eq!(Element::N.default_valences(), &[3, 5]);
        assert_eq!(Element::S.default_valences(), &[2, 4, 6]);
        assert_eq!(Element::P.default_valences(), &[3, 5]);
        assert!(Element::Fe.default_valences().is_empty());
    }

    #[test]
    fn organic_subset() {
        assert!(Element::C.is_organic_subset());
        assert!(Element::S.is_organic_subset());
        assert!(!Element::H.is_organic_subset());
        assert!(!Element::Na.is_organic_subset());
    }

    #[test]
    fn isotope_masses() {
        assert!((isotope_exact_mass(1, 2).unwrap() - 2.014101778).abs() < 1e-6);
        assert!((isotope_exact_mass(6, 13).unwrap() - 13.003354835).abs() < 1e-6);
        assert_eq!(isotope_exact_mass(6, 99), None);
        assert_eq!(isotope_exact_mass(26, 56), None);
    }
}
