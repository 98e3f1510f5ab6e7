// Weighted by repetition: picking uniformly favors the duplicated entries.

pub const KNOWN_IPS: &[&str] = &[
    "192.168.0.110",
    "127.0.0.1",
    "60.242.26.14",
    "192.127.0.0",
    "50.18.212.157",
    "50.18.212.223",
    "52.25.214.31",
    "52.26.11.205",
    "52.26.14.11",
    "52.8.19.58",
    "52.8.8.189",
    "54.149.153.72",
    "54.187.182.230",
    "54.187.199.38",
    "54.187.208.163",
    "54.67.48.128",
    "54.67.52.245",
    "54.68.165.206",
    "54.68.183.151",
    "107.23.48.182",
    "107.23.48.232",
];

pub const METHODS: &[&str] = &["GET", "GET", "GET", "POST", "POST", "PUT", "DELETE"];

pub const SECTIONS: &[&str] = &[
    "/js",
    "/img",
    "/css",
    "/",
    "/css",
    "/",
    "/load.php",
    "/img",
    "/captcha",
    "/css",
    "/foo",
    "/foo",
    "/bar",
    "/categories",
    "/pages",
    "/resources",
    "/pages",
    "/resources",
    "/images",
    "/nxmen",
];

pub const STATUS_CODES: &[&str] = &["200", "200", "200", "200", "200", "304", "403", "404"];

/// `identity user` pairs.
pub const IDENTITIES: &[&str] = &[
    "user-identifier frank",
    "- -",
    "user-identifier -",
    "- frank",
];

pub const MIN_SIZE: u64 = 10;
pub const MAX_SIZE: u64 = 100_000;
