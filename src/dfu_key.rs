//! Public key the bootloader uses to verify DFU images.
//!
//! Generated by nrfutil on 2020-10-13. Opaque to this firmware. On target
//! the key is exported as `pk` in its own `.dfu_public_key` flash section,
//! which `memory.x` keeps through `--gc-sections`.

/// Word-aligned wrapper so the key can be read as `u32`s.
#[repr(C, align(4))]
pub struct AlignedKey(pub [u8; 64]);

#[rustfmt::skip]
#[used]
#[cfg_attr(target_os = "none", export_name = "pk")]
#[cfg_attr(target_os = "none", link_section = ".dfu_public_key")]
pub static DFU_PUBLIC_KEY: AlignedKey = AlignedKey([
    0x0e, 0x33, 0x54, 0x2f, 0xba, 0x1c, 0xf4, 0x8f, 0xe2, 0x40, 0x4d, 0xa5, 0x87, 0xd8, 0x01, 0x9d,
    0x94, 0x27, 0x52, 0xa9, 0x95, 0x22, 0x59, 0x2f, 0x0c, 0x4e, 0x07, 0x6a, 0x28, 0x75, 0xb7, 0x6f,
    0xa4, 0x4e, 0x4a, 0xc1, 0xb3, 0x29, 0x93, 0x1e, 0xb1, 0x68, 0xe2, 0x5a, 0x7a, 0xd7, 0x4e, 0xbf,
    0x13, 0x8d, 0x77, 0x69, 0x0e, 0x93, 0x93, 0xc4, 0x6b, 0x6a, 0x0b, 0x4d, 0xcb, 0x77, 0x88, 0xcc,
]);

pub fn dfu_public_key() -> &'static [u8; 64] {
    &DFU_PUBLIC_KEY.0
}

/// First key word, read through a volatile load so the image keeps the
/// key even when nothing else touches it. Logged at boot.
pub fn key_id() -> u32 {
    let words = DFU_PUBLIC_KEY.0.as_ptr() as *const u32;
    // SAFETY: `AlignedKey` is 4-byte aligned and at least 4 bytes long.
    u32::from_le(unsafe { core::ptr::read_volatile(words) })
}
