//! Payload layouts of the decoded messages and encoded commands.
use super::*;
use crate::config::{DynamicModel, FixMode, SbasMode};
use crate::infra::codec::traits::UbxCommand;

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

//==================================================================================DECODERS
#[test]
fn test_posllh_fields() {
    let mut payload = [0u8; 28];
    put_i32(&mut payload, 4, -1_234_567);
    put_i32(&mut payload, 8, 450_000_000);
    put_i32(&mut payload, 12, 120_000);
    put_i32(&mut payload, 16, 100_000);
    put_u32(&mut payload, 20, 2_500);
    put_u32(&mut payload, 24, 4_000);

    let message = UbxMessage::parse(class::NAV, msg::nav::POSLLH, &payload).unwrap();
    let UbxMessage::NavPosLlh(pos) = message else {
        panic!("unexpected {:?}", message);
    };
    assert_eq!(pos.lon, -1_234_567);
    assert_eq!(pos.lat, 450_000_000);
    assert_eq!(pos.height, 120_000);
    assert_eq!(pos.h_msl, 100_000);
    assert_eq!(pos.h_acc, 2_500);
    assert_eq!(pos.v_acc, 4_000);
}

#[test]
fn test_sol_sparse_offsets() {
    let mut payload = [0u8; 52];
    payload[10] = 3;
    payload[11] = 0x0D;
    payload[44..46].copy_from_slice(&150u16.to_le_bytes());
    payload[47] = 11;

    let sol = NavSol::from_payload(&payload).unwrap();
    assert_eq!(sol.gps_fix, 3);
    assert_eq!(sol.flags, 0x0D);
    assert_eq!(sol.p_dop, 150);
    assert_eq!(sol.num_sv, 11);
}

#[test]
fn test_timeutc_validity() {
    let mut payload = [0u8; 20];
    put_i32(&mut payload, 8, 250_000_000);
    payload[12..14].copy_from_slice(&2024u16.to_le_bytes());
    payload[14] = 6;
    payload[15] = 30;
    payload[16] = 23;
    payload[17] = 59;
    payload[18] = 58;
    payload[19] = 0b0000_0111;

    let utc = NavTimeUtc::from_payload(&payload).unwrap();
    assert_eq!(utc.time.year, 2024);
    assert_eq!((utc.time.month, utc.time.day), (6, 30));
    assert_eq!((utc.time.hour, utc.time.min, utc.time.sec), (23, 59, 58));
    assert_eq!(utc.time.nano, 250_000_000);
    assert!(utc.time.is_valid());

    payload[19] = 0b0000_0001;
    assert!(!NavTimeUtc::from_payload(&payload).unwrap().time.is_valid());
}

#[test]
/// The legacy 84-byte layout and the 92-byte layout decode identically.
fn test_pvt_accepts_both_layouts() {
    let mut payload = [0u8; NavPvt::MODERN_LEN];
    payload[20] = 3;
    payload[21] = 0x01;
    payload[23] = 9;
    put_i32(&mut payload, 24, 1_000_000_000);
    put_i32(&mut payload, 56, -150);
    put_i32(&mut payload, 64, 9_000_000);
    payload[76..78].copy_from_slice(&120u16.to_le_bytes());

    let modern = NavPvt::from_payload(&payload).unwrap();
    let legacy = NavPvt::from_payload(&payload[..84]).unwrap();
    assert_eq!(modern, legacy);
    assert_eq!(modern.fix_type, 3);
    assert_eq!(modern.num_sv, 9);
    assert_eq!(modern.lon, 1_000_000_000);
    assert_eq!(modern.vel_d, -150);
    assert_eq!(modern.head_mot, 9_000_000);
    assert_eq!(modern.p_dop, 120);
}

#[test]
fn test_short_payload_is_rejected() {
    let payload = [0u8; 83];
    assert_eq!(
        UbxMessage::parse(class::NAV, msg::nav::PVT, &payload),
        Err(DeserializationError::InvalidDataLength {
            class: class::NAV,
            id: msg::nav::PVT,
            expected: 84,
            actual: 83,
        })
    );
    assert!(UbxMessage::parse(class::ACK, msg::ack::ACK, &[0x06]).is_err());
}

#[test]
/// Dispatch keys on the class as well: ACK-ACK and a NAV message sharing
/// id 0x01 stay distinct.
fn test_unknown_pairs_are_other() {
    assert_eq!(
        UbxMessage::parse(class::NAV, 0x01, &[0u8; 20]).unwrap(),
        UbxMessage::Other {
            class: class::NAV,
            id: 0x01
        }
    );
    assert_eq!(
        UbxMessage::parse(class::ACK, msg::ack::ACK, &[0x06, 0x24]).unwrap(),
        UbxMessage::AckAck(AckAck {
            cls_id: 0x06,
            msg_id: 0x24
        })
    );
}

#[test]
fn test_mon_ver_slots() {
    let mut payload = [0u8; 40 + 30 * 2 + 5];
    payload[..4].copy_from_slice(b"ROM ");
    payload[30..38].copy_from_slice(b"00080000");
    payload[40..52].copy_from_slice(b"FWVER=SPG 3.");
    payload[70..81].copy_from_slice(b"GPS;GLO;GAL");

    let ver = MonVer::from_payload(&payload).unwrap();
    assert_eq!(ver.hw_version_text(), b"00080000");
    let mut extensions = ver.extensions();
    assert_eq!(extensions.next(), Some(&b"FWVER=SPG 3."[..]));
    assert_eq!(extensions.next(), Some(&b"GPS;GLO;GAL"[..]));
    // Trailing partial slot.
    assert_eq!(extensions.next(), Some(&b""[..]));
    assert_eq!(extensions.next(), None);
}

//==================================================================================ENCODERS
fn serialize<C: UbxCommand>(command: &C) -> ([u8; 64], usize) {
    let mut buffer = [0u8; 64];
    let len = command.to_payload(&mut buffer).unwrap();
    (buffer, len)
}

#[test]
fn test_nav5_patches_template() {
    let (buffer, len) = serialize(&CfgNav5 {
        dynamic_model: DynamicModel::Pedestrian,
        fix_mode: FixMode::Only3d,
    });
    assert_eq!(len, 36);
    assert_eq!(&buffer[..4], &[0xFF, 0xFF, 3, 2]);
    assert_eq!(&buffer[8..10], &[0x10, 0x27]);
    assert_eq!(buffer[28], 0xC8);
}

#[test]
fn test_msg_and_rate_layouts() {
    let (buffer, len) = serialize(&CfgMsg {
        msg_class: class::NAV,
        msg_id: msg::nav::PVT,
        rate: 1,
    });
    assert_eq!(&buffer[..len], &[0x01, 0x07, 0x01]);

    let (buffer, len) = serialize(&CfgRate::new(200));
    assert_eq!(&buffer[..len], &[0xC8, 0x00, 0x01, 0x00, 0x01, 0x00]);
}

#[test]
fn test_sbas_layout() {
    let (buffer, len) = serialize(&CfgSbas {
        mode: SbasMode::Waas,
    });
    let mask = SbasMode::Waas.scan_mode1().to_le_bytes();
    assert_eq!(len, 8);
    assert_eq!(&buffer[..4], &[3, 3, 3, 0]);
    assert_eq!(&buffer[4..8], &mask);

    let (buffer, _) = serialize(&CfgSbas {
        mode: SbasMode::None,
    });
    assert_eq!(&buffer[..8], &[2, 3, 3, 0, 0, 0, 0, 0]);
}

#[test]
fn test_gnss_blocks() {
    let mut gnss = CfgGnss::new();
    gnss.push(GnssBlock::sbas(SbasMode::Auto)).unwrap();
    gnss.push(GnssBlock::galileo(false)).unwrap();

    let (buffer, len) = serialize(&gnss);
    assert_eq!(len, 4 + 16);
    assert_eq!(&buffer[..4], &[0, 0, 32, 2]);
    assert_eq!(&buffer[4..12], &[1, 1, 3, 0, 1, 0, 1, 0]);
    assert_eq!(&buffer[12..20], &[2, 0, 8, 0, 0, 0, 1, 0]);

    let galileo_on = GnssBlock::galileo(true);
    assert_eq!(galileo_on.reserved_channels, 4);
    assert!(galileo_on.enabled);
    assert!(!GnssBlock::sbas(SbasMode::None).enabled);
}

#[test]
fn test_gnss_capacity() {
    let mut gnss = CfgGnss::new();
    for _ in 0..crate::core::MAX_GNSS_BLOCKS {
        gnss.push(GnssBlock::galileo(true)).unwrap();
    }
    assert!(matches!(
        gnss.push(GnssBlock::galileo(true)),
        Err(crate::error::SerializationError::TooManyGnssBlocks { .. })
    ));
}

#[test]
fn test_payload_too_large_for_buffer() {
    let mut small = [0u8; 10];
    let result = CfgNav5 {
        dynamic_model: DynamicModel::Airborne1g,
        fix_mode: FixMode::Auto,
    }
    .to_payload(&mut small);
    assert!(matches!(
        result,
        Err(crate::error::SerializationError::ByteWriterError { .. })
    ));
}
