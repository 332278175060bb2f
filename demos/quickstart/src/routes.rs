use struct_bind::request::Request;

#[derive(Debug, serde::Deserialize)]
pub struct HomeFilter {
    pub city: String,
    #[serde(default)]
    pub max_price: Option<u64>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// `GET /homes?city=Rome&max_price=300000&features=garden,garage`
pub async fn list_homes(_request: Request, filter: HomeFilter) -> String {
    tracing::info!(?filter, "Listing homes");
    let max_price = filter
        .max_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "any price".into());
    format!(
        "Homes in {} up to {} with [{}]",
        filter.city,
        max_price,
        filter.features.join(", ")
    )
}

#[derive(Debug, serde::Deserialize)]
pub struct NewListing {
    pub address: String,
    pub price: u64,
}

/// `POST /sell` with a JSON body, e.g. `{"address": "1 Main St", "price": 250000}`
pub async fn sell_home(_request: Request, listing: NewListing) -> String {
    tracing::info!(?listing, "New listing");
    format!("Listed {} for {}", listing.address, listing.price)
}

/// `GET /health`
pub async fn health(_request: Request) -> &'static str {
    "OK"
}
