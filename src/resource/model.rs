//! Payloads of the Stockly api. Missing fields decode to their defaults so
//! partial answers do not fail the whole call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub street: String,
    pub city_id: i64,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub company_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Address,
    pub company_type: String,
    pub manager: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i64,
    pub sku: String,
    pub availability_status: String,
    pub minimum_order_quantity: i64,
    pub thumbnail_url: String,
    pub category_id: Option<i64>,
    pub category_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub address: Address,
    pub company_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarehouseProduct {
    pub id: i64,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub product_id: i64,
    pub quantity: i64,
    pub automated_restock: bool,
    pub availability: String,
    pub product_title: String,
    pub product_sku: String,
    pub unit_price: f64,
    pub days_remaining: Option<f64>,
    pub weekly_predicted_demand: Option<f64>,
    pub suggested_restock: Option<f64>,
}

/// Body of `POST /warehouse-products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAssignment {
    pub product_id: i64,
    pub quantity: i64,
    pub warehouse_id: i64,
}

/// Body of `PUT /warehouse-products/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub quantity: i64,
    pub automated_restock: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub buyer_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    pub status: String,
    pub total_price: f64,
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub tracking_code: String,
    pub status: String,
    pub label_url: String,
    pub rate: f64,
    pub carrier: String,
    pub service: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tracker {
    pub tracking_code: String,
    pub status: String,
    pub carrier: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: i64,
    pub company_name: String,
    pub email: String,
    pub company_type: String,
    pub manager_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarehouseSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiptItem {
    pub id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Receipt {
    pub order_id: i64,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    pub status: String,
    pub buyer: CompanySummary,
    pub supplier: CompanySummary,
    pub source_warehouse: Option<WarehouseSummary>,
    pub destination_warehouse: Option<WarehouseSummary>,
    pub total_price: f64,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryLog {
    pub id: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub product_id: i64,
    pub product_sku: String,
    pub product_title: String,
    pub action_type: String,
    pub quantity_change: i64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub source: String,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub notes: Option<String>,
    pub timestamp: String,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleRequest {
    pub id: i64,
    pub user_id: i64,
    pub role: String,
    pub approved: bool,
}

// Predictions come from the forecasting service, which uses snake_case.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    pub id: String,
    pub warehouse_id: i64,
    pub product_id: i64,
    pub data_hash: String,
    pub metadata: PredictionMetadata,
    pub recommendation: Recommendation,
    pub stock_data: StockData,
    pub demand_forecast: DemandForecast,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionMetadata {
    pub version: String,
    pub source: String,
    pub created_at: String,
    pub prediction_run_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub safety_stock: f64,
    pub suggested_restock: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockData {
    pub current: f64,
    pub days_remaining: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandForecast {
    pub daily_avg: f64,
    pub daily_predicted: f64,
    pub weekly_predicted_7d: f64,
}
