//! Fixed protocol parameters: the DH group and the FFS identity used for
//! this demo binary. A real deployment would provision the FFS private key
//! per-identity rather than embedding one in the binary; this mirrors the
//! reference implementation, which does the same.

use once_cell::sync::Lazy;

use bigint::BigInt;

pub const FFS_ROUNDS: u32 = 4;

/// `G = 2`.
pub static DH_GENERATOR: Lazy<BigInt> = Lazy::new(|| BigInt::from_decimal("2").unwrap());

/// The 2048-bit MODP group 14 safe prime (RFC 3526 §3) — the same
/// `dhModulus` literal the reference's `main.cpp` hardcodes, not the
/// 1536-bit group 5 prime the protocol description elsewhere suggests.
pub static DH_MODULUS: Lazy<BigInt> = Lazy::new(|| {
    BigInt::from_hex(concat!(
        "0xFFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
        "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
        "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
        "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
        "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
        "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
        "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
        "670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
        "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9",
        "DE2BCBF6955817183995497CEA956AE515D2261898FA0510",
        "15728E5A8AACAA68FFFFFFFFFFFFFFFF",
    ))
    .unwrap()
});

/// The Blum integer `N = p*q` used as the FFS modulus.
pub static FFS_MODULUS: Lazy<BigInt> = Lazy::new(|| {
    BigInt::from_decimal(concat!(
        "685409474032871696453716219498704414714106835343556700142349588612398643152448418044507793193555",
        "584291862400433331281987076823435033883177070456933035846659515389194621900980212317917384633642",
        "913152564393562301336956682702203238239716425986242747859203766880668087117389959470726110276503",
        "469445067926817674597536811856850846115309267930016955502973150819299571321835493454820176584982",
        "986656470521104003243487710077662238833851036770426809627045941112642280803788065483304274286584",
        "767983093907148512930779777992764347754840023892759415520050401194996642255666918474614390205408",
        "44282757762659001103626502226286465445073",
    ))
    .unwrap()
});

/// The demo FFS private key `(s_1 ... s_5)`, kept coprime to [`FFS_MODULUS`].
pub static FFS_PRIVATE_KEY: Lazy<Vec<BigInt>> = Lazy::new(|| {
    [
        concat!(
            "134627368046300552427213971528104503574802276462752360572449387008678412666545109350352053965887",
            "049525763213237888074548437224344385138300375828429147344139927036638219233241549582519794862884",
            "437087923611883610742749695302071228684562386510873961041673589395162459279671886897123837452469",
            "539076695340931353283",
        ),
        concat!(
            "305720623684541830382357813174126029572888631512807696562043329322051733106703141875635517872428",
            "472166185802005522830245254865302672537661004826938427402912095855592621069711416109011614095364",
            "045972789494645495700596284071059043185120953567996264878559448534555804477535466422265836935755",
            "93097486168856693183",
        ),
        concat!(
            "119925541934206168022269974280027645238316170164087398691457253785998088673324437188441316732899",
            "429768497870197942410390497397537518637985584817662681332899424760268662938568848614019172431072",
            "682897109319774220120705873491578312560483181881048627688960060057713839722276384686732650457446",
            "521916563823532945558",
        ),
        concat!(
            "163824803353976558309704168845282494449802842384031872339220008472998725791673617970083314497443",
            "372239716700354951383227631141118458848051027900059570146239667751021214582456078899794066010537",
            "961548679873524047121409621075727031203987784950798844594676481352228203927250750932942883988689",
            "332663391207969147633",
        ),
        concat!(
            "179666982146692031553424715309143768519745212741152008073209265291978766479247697385798876093698",
            "815035272972016125798688468091605771393649878294147218712730444130716295446286387104649163718160",
            "365804164168170708962694915005517379214413631599921157465501685906795936553844375731335252153836",
            "344762325956046790606",
        ),
    ]
    .iter()
    .map(|s| BigInt::from_decimal(s).unwrap())
    .collect()
});
