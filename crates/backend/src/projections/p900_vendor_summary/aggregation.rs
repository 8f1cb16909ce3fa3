//! Stage 1 of the vendor summary: group each source on its own grain, then
//! left-join everything onto the purchase groups.
//!
//! NULL handling follows SQL: a NULL price never passes `> 0`, sums skip
//! NULLs and stay NULL when nothing was summed, NULL keys never join.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use contracts::domain::a001_purchase::PurchaseRecord;
use contracts::domain::a002_sale::SaleRecord;
use contracts::domain::a003_inventory_location::InventoryLocationRecord;
use contracts::domain::a004_vendor_invoice::FreightRecord;
use serde::Serialize;

use super::sources::SummarySources;

/// Adds `value` to a SQL-style SUM accumulator
fn sum_nullable(acc: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value {
        *acc = Some(acc.unwrap_or(0.0) + v);
    }
}

/// Purchase price as a grouping key, totally ordered
#[derive(Debug, Clone, Copy)]
pub struct PriceKey(pub f64);

impl PartialEq for PriceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Grain of the summary. Field order is the sort order of the groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PurchaseGroupKey {
    pub vendor_number: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub purchase_price: PriceKey,
    pub store: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseTotals {
    pub quantity: Option<f64>,
    pub dollars: Option<f64>,
}

/// Group purchases with a positive price on the summary grain
pub fn build_purchase_aggregate(
    purchases: &[PurchaseRecord],
) -> BTreeMap<PurchaseGroupKey, PurchaseTotals> {
    let mut groups: BTreeMap<PurchaseGroupKey, PurchaseTotals> = BTreeMap::new();

    for purchase in purchases.iter().filter(|p| p.has_positive_price()) {
        let Some(price) = purchase.purchase_price else {
            continue;
        };
        let key = PurchaseGroupKey {
            vendor_number: purchase.vendor_number,
            vendor_name: purchase.vendor_name.clone(),
            brand: purchase.brand.clone(),
            description: purchase.description.clone(),
            purchase_price: PriceKey(price),
            store: purchase.store,
        };
        let totals = groups.entry(key).or_default();
        sum_nullable(&mut totals.quantity, purchase.quantity);
        sum_nullable(&mut totals.dollars, purchase.dollars);
    }

    groups
}

/// Store to City lookup built from the union of the inventory snapshots
#[derive(Debug, Clone, Default)]
pub struct StoreCityMap {
    cities: BTreeMap<i64, BTreeSet<String>>,
}

impl StoreCityMap {
    /// City of a store. A store listed under several cities resolves to the
    /// lexicographically smallest one.
    pub fn city(&self, store: i64) -> Option<&str> {
        self.cities
            .get(&store)
            .and_then(|cities| cities.iter().next())
            .map(String::as_str)
    }

    /// Stores that map to more than one city
    pub fn ambiguous_stores(&self) -> impl Iterator<Item = (i64, &BTreeSet<String>)> {
        self.cities
            .iter()
            .filter(|(_, cities)| cities.len() > 1)
            .map(|(store, cities)| (*store, cities))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

pub fn build_store_city_map<'a, I>(locations: I) -> StoreCityMap
where
    I: IntoIterator<Item = &'a InventoryLocationRecord>,
{
    let mut cities: BTreeMap<i64, BTreeSet<String>> = BTreeMap::new();
    for location in locations {
        if let (Some(store), Some(city)) = (location.store, location.city.as_ref()) {
            cities.entry(store).or_default().insert(city.clone());
        }
    }

    let map = StoreCityMap { cities };
    for (store, candidates) in map.ambiguous_stores() {
        tracing::warn!(
            "Store {} maps to {} cities {:?}, using '{}'",
            store,
            candidates.len(),
            candidates,
            map.city(store).unwrap_or_default()
        );
    }
    map
}

/// Grain of the sales aggregate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SalesGroupKey {
    pub vendor_no: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub store: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTotals {
    /// SUM(SalesPrice * SalesQuantity)
    pub extended_price: Option<f64>,
    pub quantity: Option<f64>,
    pub dollars: Option<f64>,
    pub excise_tax: Option<f64>,
}

impl SalesTotals {
    fn add_sale(&mut self, sale: &SaleRecord) {
        sum_nullable(&mut self.extended_price, sale.extended_price());
        sum_nullable(&mut self.quantity, sale.sales_quantity);
        sum_nullable(&mut self.dollars, sale.sales_dollars);
        sum_nullable(&mut self.excise_tax, sale.excise_tax);
    }

    fn merge(&mut self, other: &SalesTotals) {
        sum_nullable(&mut self.extended_price, other.extended_price);
        sum_nullable(&mut self.quantity, other.quantity);
        sum_nullable(&mut self.dollars, other.dollars);
        sum_nullable(&mut self.excise_tax, other.excise_tax);
    }

    /// Quantity-weighted average sale price; NULL when nothing was sold
    pub fn avg_sales_price(&self) -> Option<f64> {
        let quantity = self.quantity?;
        if quantity == 0.0 {
            return None;
        }
        Some(self.extended_price? / quantity)
    }
}

pub fn build_sales_aggregate(sales: &[SaleRecord]) -> BTreeMap<SalesGroupKey, SalesTotals> {
    let mut groups: BTreeMap<SalesGroupKey, SalesTotals> = BTreeMap::new();
    for sale in sales {
        let key = SalesGroupKey {
            vendor_no: sale.vendor_no,
            vendor_name: sale.vendor_name.clone(),
            brand: sale.brand.clone(),
            store: sale.store,
        };
        groups.entry(key).or_default().add_sale(sale);
    }
    groups
}

/// Total freight per vendor. Invoices without a vendor number are dropped
/// since they can never join.
pub fn build_freight_aggregate(freight: &[FreightRecord]) -> HashMap<i64, Option<f64>> {
    let mut totals: HashMap<i64, Option<f64>> = HashMap::new();
    for invoice in freight {
        if let Some(vendor) = invoice.vendor_number {
            sum_nullable(totals.entry(vendor).or_default(), invoice.freight);
        }
    }
    totals
}

/// One purchase group enriched with city, sales and freight, before cleaning
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JoinedSummaryRow {
    pub vendor_number: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub purchase_price: f64,
    pub total_purchase_quantity: Option<f64>,
    pub total_purchase_dollars: Option<f64>,
    pub total_freight_cost: Option<f64>,
    pub store: Option<i64>,
    pub city: Option<String>,
    pub avg_sales_price: Option<f64>,
    pub total_sales_quantity: Option<f64>,
    pub total_sales_dollars: Option<f64>,
    pub total_excise_tax: Option<f64>,
}

type SalesJoinKey = (i64, String, i64);

/// Sales groups indexed by the join key (VendorNo, Brand, Store).
///
/// Groups that differ only by VendorName share a join key; they are merged
/// so a purchase row matches at most one sales entry.
fn index_sales(
    sales: &BTreeMap<SalesGroupKey, SalesTotals>,
) -> HashMap<SalesJoinKey, SalesTotals> {
    let mut index: HashMap<SalesJoinKey, SalesTotals> = HashMap::new();
    let mut merged = 0usize;

    for (key, totals) in sales {
        let (Some(vendor), Some(brand), Some(store)) =
            (key.vendor_no, key.brand.as_ref(), key.store)
        else {
            continue;
        };
        match index.get_mut(&(vendor, brand.clone(), store)) {
            Some(existing) => {
                existing.merge(totals);
                merged += 1;
            }
            None => {
                index.insert((vendor, brand.clone(), store), totals.clone());
            }
        }
    }

    if merged > 0 {
        tracing::warn!(
            "{} sales groups merged on a shared (VendorNo, Brand, Store) key",
            merged
        );
    }
    index
}

/// Left-join the purchase groups to city, sales and freight, ordered by vendor number
pub fn join_sources(
    purchases: BTreeMap<PurchaseGroupKey, PurchaseTotals>,
    cities: &StoreCityMap,
    sales: &BTreeMap<SalesGroupKey, SalesTotals>,
    freight: &HashMap<i64, Option<f64>>,
) -> Vec<JoinedSummaryRow> {
    let sales_index = index_sales(sales);

    let mut rows: Vec<JoinedSummaryRow> = purchases
        .into_iter()
        .map(|(key, totals)| {
            let city = key
                .store
                .and_then(|store| cities.city(store))
                .map(str::to_string);

            let sale = match (key.vendor_number, key.brand.as_ref(), key.store) {
                (Some(vendor), Some(brand), Some(store)) => {
                    sales_index.get(&(vendor, brand.clone(), store))
                }
                _ => None,
            };

            let total_freight_cost = key
                .vendor_number
                .and_then(|vendor| freight.get(&vendor).copied().flatten());

            JoinedSummaryRow {
                vendor_number: key.vendor_number,
                vendor_name: key.vendor_name,
                brand: key.brand,
                description: key.description,
                purchase_price: key.purchase_price.0,
                total_purchase_quantity: totals.quantity,
                total_purchase_dollars: totals.dollars,
                total_freight_cost,
                store: key.store,
                city,
                avg_sales_price: sale.and_then(SalesTotals::avg_sales_price),
                total_sales_quantity: sale.and_then(|s| s.quantity),
                total_sales_dollars: sale.and_then(|s| s.dollars),
                total_excise_tax: sale.and_then(|s| s.excise_tax),
            }
        })
        .collect();

    // Stable: ties keep the group order
    rows.sort_by_key(|row| row.vendor_number);
    rows
}

/// Run the whole stage over materialized sources
pub fn aggregate(sources: &SummarySources) -> Vec<JoinedSummaryRow> {
    let purchases = build_purchase_aggregate(&sources.purchases);
    let cities = build_store_city_map(&sources.locations);
    let sales = build_sales_aggregate(&sources.sales);
    let freight = build_freight_aggregate(&sources.freight);

    tracing::info!(
        "Aggregated {} purchase groups, {} store cities, {} sales groups, {} freight vendors",
        purchases.len(),
        cities.len(),
        sales.len(),
        freight.len()
    );

    join_sources(purchases, &cities, &sales, &freight)
}
