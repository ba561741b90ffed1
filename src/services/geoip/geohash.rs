//! Geohash 编码
//!
//! 纬度、经度各量化为 32 位整数后交错（经度位在高位），
//! 取高 `5 * precision` 位按 base32 输出。

/// Geohash base32 字母表（去掉 a/i/l/o）
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// 默认精度（字符数）
pub const DEFAULT_PRECISION: usize = 12;

/// 最大精度：64 位交错值可提供 12 个完整字符
const MAX_PRECISION: usize = 12;

/// 按默认精度编码
pub fn encode(latitude: f64, longitude: f64) -> String {
    encode_with_precision(latitude, longitude, DEFAULT_PRECISION)
}

/// 按指定精度编码，精度上限 12
pub fn encode_with_precision(latitude: f64, longitude: f64, precision: usize) -> String {
    let precision = precision.min(MAX_PRECISION);

    let lat = quantize(latitude, 90.0);
    let lng = quantize(longitude, 180.0);
    let hash = spread(lat) | (spread(lng) << 1);

    (0..precision)
        .map(|i| {
            let shift = 64 - 5 * (i + 1);
            BASE32[((hash >> shift) & 0x1f) as usize] as char
        })
        .collect()
}

/// 把 `[-range, range]` 上的值映射到 `[0, 2^32)`
fn quantize(x: f64, range: f64) -> u32 {
    if !x.is_finite() {
        return quantize(0.0, range);
    }
    let p = (x.clamp(-range, range) + range) / (2.0 * range);
    // `as` 在上界处饱和到 u32::MAX
    (p * 4_294_967_296.0) as u32
}

/// 在每两位之间插入一个 0 位
fn spread(x: u32) -> u64 {
    let mut x = x as u64;
    x = (x | (x << 16)) & 0x0000_ffff_0000_ffff;
    x = (x | (x << 8)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;
    x
}
