use contracts::domain::a001_purchase::PurchaseRecord;
use contracts::domain::a002_sale::SaleRecord;
use contracts::domain::a003_inventory_location::InventoryLocationRecord;
use contracts::domain::a004_vendor_invoice::FreightRecord;
use sea_orm::ConnectionTrait;

use crate::domain::a003_inventory_location::repository::load_locations;
use crate::domain::a004_vendor_invoice::repository::load_freight;
use crate::domain::{a001_purchase, a002_sale};
use crate::shared::config::SourceTables;
use crate::shared::data::DataError;

/// The four base sources of the summary, fully materialized
#[derive(Debug, Clone, Default)]
pub struct SummarySources {
    pub purchases: Vec<PurchaseRecord>,
    pub sales: Vec<SaleRecord>,
    /// Union of the begin and end inventory locations
    pub locations: Vec<InventoryLocationRecord>,
    pub freight: Vec<FreightRecord>,
}

impl SummarySources {
    /// Read all sources. Any missing table or column aborts the load.
    pub async fn load<C: ConnectionTrait>(
        conn: &C,
        tables: &SourceTables,
    ) -> Result<Self, DataError> {
        let purchases = a001_purchase::repository::load_all(conn, &tables.purchases).await?;
        let sales = a002_sale::repository::load_all(conn, &tables.sales).await?;

        let mut locations = load_locations(conn, &tables.begin_inventory).await?;
        locations.extend(load_locations(conn, &tables.end_inventory).await?);

        let freight = load_freight(conn, &tables.vendor_invoice).await?;

        tracing::info!(
            "Loaded {} purchases, {} sales, {} store locations, {} invoices",
            purchases.len(),
            sales.len(),
            locations.len(),
            freight.len()
        );

        Ok(Self {
            purchases,
            sales,
            locations,
            freight,
        })
    }
}
