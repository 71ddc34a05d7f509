#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub service_id: u16,
    pub attribute_id: u16,
    pub length: usize,
}

// The strap's byte order is little-endian
pub fn decode_u32(payload: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = payload.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_u32_roundtrip() {
        assert_eq!(decode_u32(&encode_u32(0)), Some(0));
        assert_eq!(decode_u32(&encode_u32(1234)), Some(1234));
        assert_eq!(decode_u32(&encode_u32(u32::MAX)), Some(u32::MAX));
    }

    #[test]
    fn test_decode_u32_rejects_wrong_length() {
        assert_eq!(decode_u32(&[]), None);
        assert_eq!(decode_u32(&[1, 2, 3]), None);
        assert_eq!(decode_u32(&[1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn test_decode_u32_little_endian() {
        assert_eq!(decode_u32(&[0x01, 0x00, 0x00, 0x00]), Some(1));
        assert_eq!(decode_u32(&[0x00, 0x01, 0x00, 0x00]), Some(256));
    }
}
