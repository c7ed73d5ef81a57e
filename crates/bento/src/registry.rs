//! The attribute type registry.
//!
//! Every concrete value kind has a 4-byte tag. Tags are the wire identity of
//! a type and also its spelling inside a text type annotation (`["x"(u16)=3]`).

use bento_common::TypeTag;

pub const S8: TypeTag = TypeTag::new("s8");
pub const U8: TypeTag = TypeTag::new("u8");
pub const S16: TypeTag = TypeTag::new("s16");
pub const U16: TypeTag = TypeTag::new("u16");
pub const S32: TypeTag = TypeTag::new("s32");
pub const U32: TypeTag = TypeTag::new("u32");
pub const S64: TypeTag = TypeTag::new("s64");
pub const U64: TypeTag = TypeTag::new("u64");
pub const FLOAT: TypeTag = TypeTag::new("flt");
pub const DOUBLE: TypeTag = TypeTag::new("dbl");
pub const BOOL: TypeTag = TypeTag::new("bool");
pub const CHAR: TypeTag = TypeTag::new("char");
pub const STRING: TypeTag = TypeTag::new("str");
pub const DURATION: TypeTag = TypeTag::new("dur");
pub const INSTANT: TypeTag = TypeTag::new("time");
pub const SIZE: TypeTag = TypeTag::new("size");
pub const ISIZE: TypeTag = TypeTag::new("isiz");
pub const POINT: TypeTag = TypeTag::new("pt");
pub const IPOINT: TypeTag = TypeTag::new("ipt");
pub const POINT3D: TypeTag = TypeTag::new("pt3");
pub const IPOINT3D: TypeTag = TypeTag::new("ipt3");
pub const LINE: TypeTag = TypeTag::new("line");
pub const ILINE: TypeTag = TypeTag::new("ilin");
pub const RECT: TypeTag = TypeTag::new("rect");
pub const IRECT: TypeTag = TypeTag::new("irct");
pub const POLYGON: TypeTag = TypeTag::new("poly");
pub const IPOLYGON: TypeTag = TypeTag::new("ipol");
pub const COLOR: TypeTag = TypeTag::new("colr");
pub const BINARY: TypeTag = TypeTag::new("bin");
pub const S8_ARRAY: TypeTag = TypeTag::new("s8a");
pub const S16_ARRAY: TypeTag = TypeTag::new("s16a");
pub const S32_ARRAY: TypeTag = TypeTag::new("s32a");
pub const S64_ARRAY: TypeTag = TypeTag::new("s64a");
pub const STRING_ARRAY: TypeTag = TypeTag::new("stra");
pub const BOOL_ARRAY: TypeTag = TypeTag::new("bola");
pub const DOUBLE_ARRAY: TypeTag = TypeTag::new("dbla");
pub const DURATION_ARRAY: TypeTag = TypeTag::new("dura");
pub const INSTANT_ARRAY: TypeTag = TypeTag::new("tima");

/// Every known tag, most frequently used first.
///
/// Binary decode walks this order, so common payloads dispatch early.
pub const KNOWN_TAGS: [TypeTag; 38] = [
    STRING,
    S32,
    BOOL,
    DOUBLE,
    S64,
    U32,
    FLOAT,
    INSTANT,
    DURATION,
    U8,
    S8,
    U16,
    S16,
    U64,
    CHAR,
    BINARY,
    STRING_ARRAY,
    S32_ARRAY,
    DOUBLE_ARRAY,
    POINT,
    IPOINT,
    SIZE,
    ISIZE,
    RECT,
    IRECT,
    COLOR,
    POINT3D,
    IPOINT3D,
    LINE,
    ILINE,
    POLYGON,
    IPOLYGON,
    S8_ARRAY,
    S16_ARRAY,
    S64_ARRAY,
    BOOL_ARRAY,
    DURATION_ARRAY,
    INSTANT_ARRAY,
];

/// Whether `tag` names one of the built-in types.
pub fn is_known(tag: TypeTag) -> bool {
    KNOWN_TAGS.contains(&tag)
}

/// Resolve a text type annotation such as `s16` or ` dbl ` to its tag.
pub fn lookup(annotation: &str) -> Option<TypeTag> {
    let annotation = annotation.trim();
    if annotation.is_empty() || annotation.len() > TypeTag::LEN {
        return None;
    }
    KNOWN_TAGS.iter().copied().find(|tag| tag.matches(annotation))
}

/// Types whose text form is recognised without an annotation.
pub fn is_inferable(tag: TypeTag) -> bool {
    tag == BOOL || tag == CHAR || tag == STRING || tag == S32
}
