//! Stored RTTTL melodies

/// Celebration tune played by the startup and dope sequences
pub const DELLA: &str = concat!(
  "Della:d=8,o=5,b=125:b4,c,d,4d,p,4g,4f#,4g,4a,b,1g,p,p,p,f#,g,4d6.,g,1g,",
  "p,p,g,g,2g,p,a,g,1f#,p,4b4.,p,b4,a4,g4,2d,p,4g,4a,4c6.,b,2b.,p,p,4d6,4c6,",
  "b,c6,b,4g,4d.,p,a,g,f#,e,4f#,p,4g,p,4g,p,1g",
);

pub const STARTUP: &str = "Startup:d=16,o=5,b=180:c,e,g,8c6";

pub const SUCCESS: &str = "Success:d=8,o=5,b=200:c,e,g,4c6";

pub const ERROR: &str = "Error:d=8,o=4,b=120:c,p,c,p,c";

pub const ALERT: &str = "Alert:d=16,o=5,b=200:g,p,g,p,g,p,4g";

pub const HAPPY: &str = "Happy:d=8,o=5,b=160:c,d,e,f,4g,4g,a,a,a,a,4g";

pub const SLEEP: &str = "Sleep:d=4,o=4,b=80:c,e,g,2c5";

pub const ALL: [&str; 7] = [DELLA, STARTUP, SUCCESS, ERROR, ALERT, HAPPY, SLEEP];
