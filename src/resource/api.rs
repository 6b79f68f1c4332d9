use std::fmt::Display;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::client::{Client, Part, Request};
use crate::resource::model::{
    Company, InventoryLog, Order, Prediction, Shipment, StockAssignment, StockUpdate, Tracker,
    Warehouse, WarehouseProduct,
};
use crate::resource::{
    validate_pdf, Companies, Endpoint, InventoryLogs, Orders, Page, PageRequest, Predictions,
    Receipts, Resource, RoleRequests, Shipments, Tag, TagKind, Warehouses,
};
use crate::Result;

/// Typed handle on one resource collection.
pub struct Api<'a, R> {
    client: &'a Client,
    _resource: PhantomData<R>,
}

impl Client {
    pub fn resource<R: Resource>(&self) -> Api<'_, R> {
        Api {
            client: self,
            _resource: PhantomData,
        }
    }
}

impl<'a, R: Resource> Api<'a, R> {
    pub async fn list(&self) -> Result<Vec<R::Model>> {
        self.client.query(Endpoint::list(&R::DESCRIPTOR)).await
    }

    pub async fn page(&self, page: &PageRequest) -> Result<Page<R::Model>> {
        self.client.query(Endpoint::page(&R::DESCRIPTOR, page)).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<R::Model>> {
        self.client.query(Endpoint::search(&R::DESCRIPTOR, term)).await
    }

    pub async fn get(&self, id: impl Display) -> Result<R::Model> {
        self.client.query(Endpoint::get(&R::DESCRIPTOR, id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<R::Model> {
        let body = serde_json::to_value(body)?;
        self.client
            .mutate(Endpoint::create(&R::DESCRIPTOR, body))
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Display,
        body: &B,
    ) -> Result<R::Model> {
        let body = serde_json::to_value(body)?;
        self.client
            .mutate(Endpoint::update(&R::DESCRIPTOR, id, body))
            .await
    }

    pub async fn delete(&self, id: impl Display) -> Result<()> {
        self.discard(Endpoint::delete(&R::DESCRIPTOR, id)).await
    }

    fn path(suffix: impl Display) -> String {
        format!("{}/{}", R::DESCRIPTOR.path, suffix)
    }

    // Mutation whose answer the caller does not need. Any body is accepted.
    async fn discard(&self, endpoint: Endpoint) -> Result<()> {
        self.client.mutate::<Value>(endpoint).await.map(drop)
    }
}

impl Api<'_, Companies> {
    pub async fn by_type(&self, company_type: &str) -> Result<Vec<Company>> {
        let endpoint = Endpoint::query(Request::get(Self::path(format!("type/{}", company_type))))
            .provides(Tag::list(TagKind::Company));
        self.client.query(endpoint).await
    }
}

impl Api<'_, Warehouses> {
    const STOCK_PATH: &'static str = "/warehouse-products";

    pub async fn count(&self) -> Result<u64> {
        let endpoint = Endpoint::query(Request::get(Self::path("count")))
            .provides(Tag::list(TagKind::Warehouse));
        self.client.query(endpoint).await
    }

    pub async fn by_manager(&self, manager_id: i64) -> Result<Vec<Warehouse>> {
        let endpoint = Endpoint::query(Request::get(Self::path(format!("manager/{}", manager_id))))
            .provides(Tag::list(TagKind::Warehouse));
        self.client.query(endpoint).await
    }

    pub async fn products(&self, warehouse_id: i64) -> Result<Vec<WarehouseProduct>> {
        let endpoint = Endpoint::query(Request::get(Self::path(format!(
            "{}/products",
            warehouse_id
        ))))
        .provides(Tag::id(TagKind::Warehouse, warehouse_id));
        self.client.query(endpoint).await
    }

    pub async fn products_page(&self, page: &PageRequest) -> Result<Page<WarehouseProduct>> {
        let request = page.apply(Request::get(Self::path("products/page")), &Warehouses::DESCRIPTOR);
        let endpoint = Endpoint::query(request).provides(Tag::list(TagKind::Warehouse));
        self.client.query(endpoint).await
    }

    /// Assign stock of a product to a warehouse. Returns the stored assignment.
    pub async fn add_product(&self, assignment: &StockAssignment) -> Result<WarehouseProduct> {
        let endpoint = Endpoint::mutation(Request::post(Self::STOCK_PATH).json(assignment)?)
            .invalidates(Tag::id(TagKind::Warehouse, assignment.warehouse_id));
        self.client.mutate(endpoint).await
    }

    pub async fn update_product(&self, id: i64, update: &StockUpdate) -> Result<WarehouseProduct> {
        let path = format!("{}/{}", Self::STOCK_PATH, id);
        let endpoint = Endpoint::mutation(Request::put(path).json(update)?)
            .invalidates(Tag::list(TagKind::Warehouse));
        self.client.mutate(endpoint).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<()> {
        let path = format!("{}/{}", Self::STOCK_PATH, id);
        let endpoint =
            Endpoint::mutation(Request::delete(path)).invalidates(Tag::list(TagKind::Warehouse));
        self.discard(endpoint).await
    }

    /// Upload a spreadsheet of warehouse stock. Returns the server's summary.
    pub async fn import_products(
        &self,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<String> {
        let path = format!("{}/import-warehouse-products", Self::STOCK_PATH);
        let request = Request::post(path).multipart(vec![Part::file("file", file_name, content)]);
        let endpoint = Endpoint::mutation(request).invalidates(Tag::list(TagKind::Warehouse));
        self.client.mutate(endpoint).await
    }
}

impl Api<'_, Orders> {
    /// Place an order. Returns the created order.
    pub async fn process<B: Serialize + ?Sized>(&self, order: &B) -> Result<Order> {
        let endpoint = Endpoint::mutation(Request::post(Self::path("process")).json(order)?)
            .invalidates(Tag::list(TagKind::Order));
        self.client.mutate(endpoint).await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<()> {
        let path = Self::path(format!("{}/status/{}", id, status));
        let endpoint =
            Endpoint::mutation(Request::patch(path)).invalidates(Tag::id(TagKind::Order, id));
        self.discard(endpoint).await
    }

    pub async fn cancel(&self, id: i64) -> Result<()> {
        let path = Self::path(format!("{}/cancel", id));
        let endpoint =
            Endpoint::mutation(Request::patch(path)).invalidates(Tag::id(TagKind::Order, id));
        self.discard(endpoint).await
    }

    pub async fn count(&self) -> Result<u64> {
        let endpoint = Endpoint::query(Request::get(Self::path("count")))
            .provides(Tag::list(TagKind::Order));
        self.client.query(endpoint).await
    }
}

impl Api<'_, Shipments> {
    pub async fn track(&self, track_id: &str) -> Result<Tracker> {
        let request = Request::get(Self::path("track")).query("trackId", track_id);
        let endpoint = Endpoint::query(request).provides(Tag::list(TagKind::Shipment));
        self.client.query(endpoint).await
    }

    pub async fn by_order(&self, order_id: i64) -> Result<Shipment> {
        let request = Request::get(Self::path("order")).query("orderId", order_id);
        let endpoint = Endpoint::query(request).provides(Tag::list(TagKind::Shipment));
        self.client.query(endpoint).await
    }
}

impl Api<'_, Receipts> {
    /// Email the receipt of an order to its buyer.
    pub async fn send(&self, order_id: i64) -> Result<String> {
        let endpoint = Endpoint::mutation(Request::post(Self::path(format!("{}/email", order_id))));
        self.client.mutate(endpoint).await
    }

    /// Download the receipt of an order as a pdf document. Never cached.
    pub async fn download(&self, order_id: i64) -> Result<Bytes> {
        let request = Request::get(Self::path(format!("{}/download", order_id)))
            .header("Accept", "application/pdf");
        let response = self.client.execute(request).await?;
        validate_pdf(response.into_bytes())
    }
}

impl Api<'_, InventoryLogs> {
    pub async fn recent(&self, warehouse_id: i64, limit: u32) -> Result<Vec<InventoryLog>> {
        let request =
            Request::get(Self::path(format!("recent/{}", warehouse_id))).query("limit", limit);
        let endpoint = Endpoint::query(request).provides(Tag::list(TagKind::InventoryLog));
        self.client.query(endpoint).await
    }
}

impl Api<'_, RoleRequests> {
    pub async fn approve(&self, id: i64) -> Result<()> {
        let endpoint = Endpoint::mutation(Request::put(Self::path(id)))
            .invalidates(Tag::id(TagKind::RoleRequest, id))
            .invalidates(Tag::list(TagKind::User));
        self.discard(endpoint).await
    }
}

impl Api<'_, Predictions> {
    pub async fn current(&self) -> Result<Vec<Prediction>> {
        self.predictions(Self::path("current")).await
    }

    /// `month` is formatted `YYYY-MM`.
    pub async fn by_month(&self, month: &str) -> Result<Vec<Prediction>> {
        self.predictions(Self::path(month)).await
    }

    pub async fn by_warehouse(&self, month: &str, warehouse_id: i64) -> Result<Vec<Prediction>> {
        self.predictions(Self::path(format!("{}/warehouse/{}", month, warehouse_id)))
            .await
    }

    pub async fn by_product(&self, month: &str, product_id: i64) -> Result<Vec<Prediction>> {
        self.predictions(Self::path(format!("{}/product/{}", month, product_id)))
            .await
    }

    async fn predictions(&self, path: String) -> Result<Vec<Prediction>> {
        let endpoint =
            Endpoint::query(Request::get(path)).provides(Tag::list(TagKind::Prediction));
        self.client.query(endpoint).await
    }
}
