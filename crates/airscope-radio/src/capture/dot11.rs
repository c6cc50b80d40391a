//! 802.11 frame metadata extraction.
//!
//! A monitor-mode capture hands us radiotap-prefixed frames: a
//! length-prefixed radiotap header followed by the 802.11 MAC header.
//! Type/subtype and the two addresses come from the MAC header;
//! signal/channel come from the vendor trailer some drivers append to
//! the radiotap area.

/// Fixed radiotap prologue: version, pad, length (u16 LE), present (u32 LE).
const RADIOTAP_PROLOGUE: usize = 8;

/// Offset of the vendor trailer byte carrying signal/channel, counted
/// from the end of the radiotap area.
const TRAILER_OFFSET: usize = 4;

/// Metadata extracted from one raw frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMeta {
    /// 802.11 frame type: 0 management, 1 control, 2 data.
    pub frame_type: u8,
    pub frame_subtype: u8,
    pub signal_dbm: Option<i32>,
    pub channel: Option<u32>,
    /// Transmitter address (addr2), absent on short control frames.
    pub source: Option<String>,
    /// Receiver address (addr1).
    pub destination: Option<String>,
}

/// Parse a radiotap-prefixed 802.11 frame.
///
/// Returns `None` when the buffer is too short to hold a radiotap
/// prologue and a frame-control field — such frames are skipped by the
/// capture loop, never fatal.
pub fn parse_frame(data: &[u8]) -> Option<FrameMeta> {
    if data.len() < RADIOTAP_PROLOGUE {
        return None;
    }

    let rt_len = usize::from(u16::from_le_bytes([data[2], data[3]]));
    if rt_len < RADIOTAP_PROLOGUE || data.len() <= rt_len {
        return None;
    }

    let dot11 = &data[rt_len..];
    let fc = dot11[0];
    let frame_type = (fc >> 2) & 0x3;
    let frame_subtype = (fc >> 4) & 0xf;

    // addr1 (receiver) and addr2 (transmitter) when the header is long
    // enough; control frames such as ACK carry only addr1.
    let destination = dot11.get(4..10).map(format_mac);
    let source = dot11.get(10..16).map(format_mac);

    let (signal_dbm, channel) = vendor_trailer(&data[..rt_len]);

    Some(FrameMeta {
        frame_type,
        frame_subtype,
        signal_dbm,
        channel,
        source,
        destination,
    })
}

/// Signal/channel from the radiotap vendor trailer.
///
/// Drivers that append per-frame radio metadata put it after the fixed
/// prologue; the byte at [`TRAILER_OFFSET`] from the end encodes signal
/// as `-(256 - b)` dBm, and the same raw byte doubles as the channel
/// field. A minimal header has no trailer: both values are absent.
fn vendor_trailer(radiotap: &[u8]) -> (Option<i32>, Option<u32>) {
    if radiotap.len() < RADIOTAP_PROLOGUE + TRAILER_OFFSET {
        return (None, None);
    }

    let byte = radiotap[radiotap.len() - TRAILER_OFFSET];
    (Some(i32::from(byte) - 256), Some(u32::from(byte)))
}

fn format_mac(bytes: &[u8]) -> String {
    let mut mac = String::with_capacity(17);
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            mac.push(':');
        }
        mac.push_str(&format!("{byte:02x}"));
    }
    mac
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Build a frame: radiotap header of `rt_len` bytes (length field
    /// set, trailer byte planted at the vendor position when it fits)
    /// followed by an 802.11 header.
    fn frame(rt_len: usize, trailer_byte: u8, fc: u8, header_len: usize) -> Vec<u8> {
        let mut data = vec![0u8; rt_len + header_len];
        data[2] = u16::try_from(rt_len).expect("rt_len fits u16").to_le_bytes()[0];
        data[3] = u16::try_from(rt_len).expect("rt_len fits u16").to_le_bytes()[1];
        if rt_len >= RADIOTAP_PROLOGUE + TRAILER_OFFSET {
            data[rt_len - TRAILER_OFFSET] = trailer_byte;
        }
        data[rt_len] = fc;
        // Recognizable addresses: dst = 01.., src = 02..
        if header_len >= 10 {
            for (idx, byte) in data[rt_len + 4..rt_len + 10].iter_mut().enumerate() {
                *byte = 0x10 + u8::try_from(idx).expect("idx < 6");
            }
        }
        if header_len >= 16 {
            for (idx, byte) in data[rt_len + 10..rt_len + 16].iter_mut().enumerate() {
                *byte = 0x20 + u8::try_from(idx).expect("idx < 6");
            }
        }
        data
    }

    #[test]
    fn beacon_with_vendor_trailer() {
        // Beacon: type 0, subtype 8 → fc = 0x80. Trailer byte 208 → -48 dBm.
        let data = frame(18, 208, 0x80, 24);
        let meta = parse_frame(&data).expect("beacon should parse");

        assert_eq!(meta.frame_type, 0);
        assert_eq!(meta.frame_subtype, 8);
        assert_eq!(meta.signal_dbm, Some(-48));
        assert_eq!(meta.channel, Some(208));
        assert_eq!(meta.destination.as_deref(), Some("10:11:12:13:14:15"));
        assert_eq!(meta.source.as_deref(), Some("20:21:22:23:24:25"));
    }

    #[test]
    fn minimal_radiotap_has_no_signal_or_channel() {
        // 8-byte prologue only: no vendor trailer.
        let data = frame(8, 0, 0x80, 24);
        let meta = parse_frame(&data).expect("frame should parse");

        assert_eq!(meta.signal_dbm, None);
        assert_eq!(meta.channel, None);
        assert_eq!(meta.frame_type, 0);
    }

    #[test]
    fn control_frame_without_source_address() {
        // ACK: type 1, subtype 13 → fc = 0xd4; header is fc+dur+addr1 only.
        let data = frame(8, 0, 0xd4, 10);
        let meta = parse_frame(&data).expect("ack should parse");

        assert_eq!(meta.frame_type, 1);
        assert_eq!(meta.frame_subtype, 13);
        assert_eq!(meta.destination.as_deref(), Some("10:11:12:13:14:15"));
        assert_eq!(meta.source, None);
    }

    #[test]
    fn data_frame_type_bits() {
        // QoS data: type 2, subtype 8 → fc = 0x88.
        let data = frame(12, 170, 0x88, 24);
        let meta = parse_frame(&data).expect("data frame should parse");

        assert_eq!(meta.frame_type, 2);
        assert_eq!(meta.frame_subtype, 8);
        assert_eq!(meta.signal_dbm, Some(-86)); // -(256 - 170)
        assert_eq!(meta.channel, Some(170));
    }

    #[test]
    fn truncated_buffers_are_skipped() {
        assert_eq!(parse_frame(&[]), None);
        assert_eq!(parse_frame(&[0; 4]), None);

        // Radiotap length claims more bytes than the buffer holds.
        let mut data = vec![0u8; 10];
        data[2] = 64;
        assert_eq!(parse_frame(&data), None);

        // Nonsense radiotap length below the fixed prologue.
        let mut data = vec![0u8; 32];
        data[2] = 2;
        assert_eq!(parse_frame(&data), None);
    }
}
