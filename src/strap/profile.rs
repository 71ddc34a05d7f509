use super::attribute::AttributeDescriptor;

pub const SERVICE_ID: u16 = 0x1001;

// Single-byte LED actuator, 0x00 off / 0x01 on
pub const LED: AttributeDescriptor = AttributeDescriptor {
    service_id: SERVICE_ID,
    attribute_id: 0x0001,
    length: 1,
};

// Accessory uptime in seconds, read in response to a notify
pub const UPTIME: AttributeDescriptor = AttributeDescriptor {
    service_id: SERVICE_ID,
    attribute_id: 0x0002,
    length: 4,
};

// Altitude, polled on the sampling schedule
pub const ALTITUDE: AttributeDescriptor = AttributeDescriptor {
    service_id: SERVICE_ID,
    attribute_id: 0x0003,
    length: 4,
};
