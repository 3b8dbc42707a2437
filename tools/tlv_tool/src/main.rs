extern crate clap;
use clap::{App, Arg};
use colored::Colorize;
use simple_logger::SimpleLogger;
use std::process;
use std::u8;
use weave_tlv::cert;
use weave_tlv::tlv::{self, TLVReader};
use weave_tlv::tlv_types::ProfileId;
use weave_tlv::tlv_writer::DEFAULT_ENCODE_CAPACITY;

fn fail(msg: &str) -> ! {
    eprintln!("{}", msg.red());
    process::exit(1);
}

fn parse_bytes(input: &str, base: u32) -> Vec<u8> {
    let mut tlv_list = Vec::new();
    for byte in input.split_whitespace() {
        let byte = byte.strip_suffix(",").unwrap_or(byte);
        let byte = byte.strip_prefix("0x").unwrap_or(byte);
        match u8::from_str_radix(byte, base) {
            Ok(b) => tlv_list.push(b),
            Err(_) => fail(&format!("Error parsing input byte: {}", byte)),
        }
    }
    tlv_list
}

// VENDOR:PROFILE, both in hex
fn parse_profile(s: &str) -> Option<ProfileId> {
    let mut parts = s.splitn(2, ':');
    let vendor = parts.next()?.trim_start_matches("0x");
    let profile = parts.next()?.trim_start_matches("0x");
    Some(ProfileId::new(
        u16::from_str_radix(vendor, 16).ok()?,
        u16::from_str_radix(profile, 16).ok()?,
    ))
}

fn hex_string(b: &[u8]) -> String {
    b.iter()
        .map(|x| format!("{:02X}", x))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .with_colors(true)
        .without_timestamps()
        .init()
        .unwrap();

    let m = App::new("tlv_tool")
        .arg(
            Arg::with_name("hex")
                .short("h")
                .long("hex")
                .help("The input is in Hexadecimal (Default)"),
        )
        .arg(
            Arg::with_name("dec")
                .short("d")
                .long("dec")
                .help("The input is in Decimal"),
        )
        .arg(
            Arg::with_name("profile")
                .short("p")
                .long("profile")
                .takes_value(true)
                .value_name("VENDOR:PROFILE")
                .help("Profile context for implicit tags, in hex"),
        )
        .arg(
            Arg::with_name("cert")
                .long("cert")
                .help("The input is a TLV-encoded Certificate"),
        )
        .arg(
            Arg::with_name("canonical")
                .short("c")
                .long("canonical")
                .help("Print the canonical re-encoding of the input"),
        )
        .arg(Arg::with_name("tlvs").help("List of TLVs").required(true))
        .get_matches();

    // Assume hexadecimal by-default
    let base = if m.is_present("dec") { 10 } else { 16 };

    let tlv_list = parse_bytes(m.value_of("tlvs").unwrap_or_default(), base);

    let profile = match m.value_of("profile") {
        Some(p) => match parse_profile(p) {
            Some(p) => Some(p),
            None => fail(&format!("Invalid profile: {}", p)),
        },
        None if m.is_present("cert") => Some(ProfileId::SECURITY),
        None => None,
    };

    if !m.is_present("cert") && !m.is_present("canonical") {
        tlv::print_element(&tlv_list, profile);
        return;
    }

    let mut reader = TLVReader::new(&tlv_list, profile);
    let elem = match reader.element() {
        Ok(e) => e,
        Err(e) => fail(&format!("{} at offset {}", e, reader.position())),
    };
    println!("{}", elem);

    if m.is_present("cert") {
        match cert::check_cert_shape(&elem) {
            Ok(()) => println!("{}", "Certificate shape OK".green()),
            Err(e) => fail(&e.to_string()),
        }
    }

    if m.is_present("canonical") {
        match elem.encode((tlv_list.len() * 2).max(DEFAULT_ENCODE_CAPACITY)) {
            Ok(b) => println!("{}", hex_string(&b)),
            Err(e) => fail(&e.to_string()),
        }
    }
}
