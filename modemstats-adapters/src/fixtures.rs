//! Captured modem output for tests.
//!
//! Available to other crates with the `testkit` feature.

/// `xdslcmd info --stats` while the link is in showtime, one entry per line.
///
/// The first entry is the echo of the command and the last is the shell
/// prompt the session stops reading at.
pub const LINK_UP_LINES: [&str; 118] = [
    " xdslcmd info --stats",
    "xdslcmd: ADSL driver and PHY status",
    "Status: Showtime",
    "Last Retrain Reason:\t8000",
    "Last initialization procedure status:\t0",
    "Max:\tUpstream rate = 1180 Kbps, Downstream rate = 17420 Kbps",
    "Bearer:\t0, Upstream rate = 1023 Kbps, Downstream rate = 15999 Kbps",
    "",
    "Link Power State:\tL0",
    "Mode:\t\t\tADSL2+ Annex A",
    "TPS-TC:\t\t\tATM Mode(0x0)",
    "Trellis:\t\tU:ON /D:ON",
    "Line Status:\t\tNo Defect",
    "Training Status:\tShowtime",
    "",
    "\t\tDown\t\tUp",
    "SNR (dB):\t 6.2\t\t 8.1",
    "Attn(dB):\t 22.5\t\t 11.9",
    "Pwr(dBm):\t 18.3\t\t 12.4",
    "",
    "\t\t\tADSL2 framing",
    "\t\t\tBearer 0",
    "MSGc:\t\t59\t\t11",
    "B:\t\t127\t\t31",
    "M:\t\t1\t\t1",
    "T:\t\t1\t\t1",
    "R:\t\t16\t\t16",
    "S:\t\t0.1160\t\t0.9823",
    "D:\t\t64\t\t8",
    "L:\t\t4404\t\t326",
    "",
    "\t\t\tCounters",
    "\t\t\tBearer 0",
    "SF:\t\t21599612\t\t2716419",
    "SFErr:\t\t17\t\t0",
    "RS:\t\t2103145621\t\t17382944",
    "RSCorr:\t\t1824516\t\t1102",
    "RSUnCorr:\t\t342\t\t0",
    "",
    "\t\t\tBearer 0",
    "HEC:\t\t12\t\t0",
    "OCD:\t\t0\t\t0",
    "LCD:\t\t0\t\t0",
    "Total Cells:\t\t902845311\t\t0",
    "Data Cells:\t\t21944712\t\t0",
    "Bit Errors:\t\t0\t\t0",
    "",
    "\t\tNear-End\tFar-End",
    "ES:\t\t3\t\t14",
    "SES:\t\t0\t\t2",
    "UAS:\t\t31\t\t33",
    "AS:\t\t86012",
    "",
    "\t\t\tBearer 0",
    "INP:\t\t2.00\t\t0.00",
    "INPRein:\t\t0.00\t\t0.00",
    "delay:\t\t8\t\t4",
    "PER:\t\t16.06\t\t15.52",
    "OR:\t\t31.87\t\t8.24",
    "AgR:\t\t16030.04\t1031.49",
    "",
    "Bitswap:\t\t55312/55318\t\t11/11",
    "",
    "Total time = 1 days 1 hours 45 min 33 sec",
    "FEC:\t\t9000000\t\t4321",
    "CRC:\t\t1021\t\t12",
    "ES:\t\t301\t\t20",
    "SES:\t\t4\t\t2",
    "UAS:\t\t88\t\t88",
    "LOS:\t\t1\t\t0",
    "LOF:\t\t2\t\t0",
    "LOM:\t\t0\t\t0",
    "Latest 15 minutes time = 10 min 33 sec",
    "FEC:\t\t118\t\t0",
    "CRC:\t\t0\t\t0",
    "ES:\t\t0\t\t0",
    "SES:\t\t0\t\t0",
    "UAS:\t\t0\t\t0",
    "LOS:\t\t0\t\t0",
    "LOF:\t\t0\t\t0",
    "LOM:\t\t0\t\t0",
    "Previous 15 minutes time = 15 min 0 sec",
    "FEC:\t\t1824516\t\t1102",
    "CRC:\t\t3\t\t0",
    "ES:\t\t1\t\t0",
    "SES:\t\t0\t\t0",
    "UAS:\t\t0\t\t0",
    "LOS:\t\t0\t\t0",
    "LOF:\t\t0\t\t0",
    "LOM:\t\t0\t\t0",
    "Latest 1 day time = 1 hours 45 min 33 sec",
    "FEC:\t\t20117\t\t51",
    "CRC:\t\t40\t\t1",
    "ES:\t\t9\t\t1",
    "SES:\t\t0\t\t0",
    "UAS:\t\t0\t\t0",
    "LOS:\t\t0\t\t0",
    "LOF:\t\t0\t\t0",
    "LOM:\t\t0\t\t0",
    "Previous 1 day time = 24 hours 0 sec",
    "FEC:\t\t415533\t\t873",
    "CRC:\t\t512\t\t7",
    "ES:\t\t120\t\t6",
    "SES:\t\t1\t\t0",
    "UAS:\t\t31\t\t31",
    "LOS:\t\t0\t\t0",
    "LOF:\t\t0\t\t0",
    "LOM:\t\t0\t\t0",
    "Since Link time = 23 hours 53 min 32 sec",
    "FEC:\t\t1824516\t\t1102",
    "CRC:\t\t802\t\t9",
    "ES:\t\t3\t\t14",
    "SES:\t\t0\t\t2",
    "UAS:\t\t31\t\t33",
    "LOS:\t\t0\t\t0",
    "LOF:\t\t0\t\t0",
    "LOM:\t\t0\t\t0",
    "#",
];

/// `xdslcmd info --stats` while the line has no sync.
pub const LINK_DOWN_LINES: [&str; 10] = [
    " xdslcmd info --stats",
    "xdslcmd: ADSL driver and PHY status",
    "Status: Idle",
    "Last Retrain Reason:\t0",
    "Last initialization procedure status:\t0",
    "Max:\tUpstream rate = 0 Kbps, Downstream rate = 0 Kbps",
    "Bearer:\t0, Upstream rate = 0 Kbps, Downstream rate = 0 Kbps",
    "",
    "Link Power State:\tL3",
    "#",
];

/// `cat /proc/uptime` output matching the dumps above.
pub const UPTIME: &str = " cat /proc/uptime\r\n12345.67 89.01\r\n#";

/// The link-up dump as owned lines, for tests that edit single lines.
pub fn link_up_lines() -> Vec<String> {
    LINK_UP_LINES.iter().map(|l| l.to_string()).collect()
}

/// The link-up dump as the modem sends it.
pub fn link_up_dump() -> Vec<u8> {
    LINK_UP_LINES.join("\r\n").into_bytes()
}

/// The link-down dump as the modem sends it.
pub fn link_down_dump() -> Vec<u8> {
    LINK_DOWN_LINES.join("\r\n").into_bytes()
}
