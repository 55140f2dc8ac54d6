//! 十六进制数量解码模块
//!
//! 将RPC端点返回的`0x`前缀十六进制字符串解析为整数

use crate::error::ProbeError;

/// 将十六进制字符串解析为有符号64位整数
///
/// # 参数
/// * `hex_str` - 十六进制字符串，`0x`前缀存在时会被剥离
///
/// # 返回
/// * `Result<i64, ProbeError>` - 解析结果，空内容、非十六进制字符或
///   超出64位范围时返回`DecodeError`
pub fn hex_to_int(hex_str: &str) -> Result<i64, ProbeError> {
    let body = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    i64::from_str_radix(body, 16)
        .map_err(|e| ProbeError::DecodeError(format!("{hex_str:?}: {e}")))
}
