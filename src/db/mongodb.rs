use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};

use super::client::{DbResult, Query, QueryClient};
use super::models::{
    Expense, FoodItem, Ingredient, MenuCategory, Order, RestaurantTable, Room, StaffMember,
    StaffShift,
};
use super::Resource;

/// Backend MongoDB: cada tabla es una colección de documentos
#[derive(Debug, Clone)]
pub struct MongoClient {
    pub client: Client,
    pub database: Database,
}

impl MongoClient {
    pub async fn connect(uri: &str, database_name: &str) -> DbResult<MongoClient> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database_name);

        // Test connection
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(database = %database_name, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoClient { client, database })
    }

    fn table(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Crea índices: `id` único en todas las tablas más los de búsqueda frecuente
    pub async fn create_indexes(&self) -> DbResult<()> {
        use mongodb::{options::IndexOptions, IndexModel};

        let tables = [
            Room::TABLE,
            RestaurantTable::TABLE,
            MenuCategory::TABLE,
            FoodItem::TABLE,
            Ingredient::TABLE,
            StaffMember::TABLE,
            StaffShift::TABLE,
            Order::TABLE,
            Expense::TABLE,
        ];

        for name in tables {
            let id_index = IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.table(name).create_index(id_index).await?;
        }

        let table_indexes = vec![
            IndexModel::builder().keys(doc! { "room_id": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "room_id": 1, "table_number": 1 })
                .build(),
        ];
        self.table(RestaurantTable::TABLE)
            .create_indexes(table_indexes)
            .await?;

        self.table(FoodItem::TABLE)
            .create_index(IndexModel::builder().keys(doc! { "category_id": 1 }).build())
            .await?;

        self.table(StaffShift::TABLE)
            .create_index(IndexModel::builder().keys(doc! { "staff_id": 1, "date": 1 }).build())
            .await?;

        self.table(Order::TABLE)
            .create_index(IndexModel::builder().keys(doc! { "status": 1 }).build())
            .await?;

        self.table(Expense::TABLE)
            .create_index(IndexModel::builder().keys(doc! { "date": 1 }).build())
            .await?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }
}

#[async_trait]
impl QueryClient for MongoClient {
    async fn select(&self, table: &str, query: &Query) -> DbResult<Vec<Document>> {
        let collection = self.table(table);
        let mut find = collection.find(query.filter_document());
        if let Some(sort) = query.sort_document() {
            find = find.sort(sort);
        }
        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }

        let mut cursor = find.await?;
        let mut rows = Vec::new();

        while cursor.advance().await? {
            let mut row = cursor.deserialize_current()?;
            // El _id de Mongo no forma parte del modelo
            row.remove("_id");
            rows.push(row);
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Document) -> DbResult<()> {
        self.table(table).insert_one(row).await?;
        Ok(())
    }

    async fn update(&self, table: &str, query: &Query, changes: Document) -> DbResult<u64> {
        let result = self
            .table(table)
            .update_many(query.filter_document(), doc! { "$set": changes })
            .await?;
        Ok(result.matched_count)
    }

    async fn delete(&self, table: &str, query: &Query) -> DbResult<u64> {
        let result = self.table(table).delete_many(query.filter_document()).await?;
        Ok(result.deleted_count)
    }

    async fn count(&self, table: &str, query: &Query) -> DbResult<u64> {
        Ok(self.table(table).count_documents(query.filter_document()).await?)
    }
}
