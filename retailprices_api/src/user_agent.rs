/// User agent sent with every request, e.g. `azure-prices/0.3.0`.
pub fn get_user_agent() -> String {
    format!("azure-prices/{}", env!("CARGO_PKG_VERSION"))
}
