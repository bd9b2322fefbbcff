use crate::descriptor::{ConnectionRecord, FINGERPRINT, FLOW, NETWORK, SECURITY};

pub const LINK_LABEL: &str = "XReality";

/// Canonical `vless://` share link. Parameter order is what client apps
/// expect; values are emitted as-is without percent-encoding.
pub fn build(record: &ConnectionRecord) -> String {
	format!(
		"vless://{id}@{address}:{port}?security={SECURITY}&encryption=none&pbk={pbk}&headerType=none&fp={FINGERPRINT}&type={NETWORK}&flow={FLOW}&sni={sni}&sid={sid}#{LINK_LABEL}",
		id = record.identity,
		address = record.address,
		port = record.port,
		pbk = record.public_key,
		sni = record.server_name,
		sid = record.short_id,
	)
}
