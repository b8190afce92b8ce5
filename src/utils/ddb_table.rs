use std::cmp;
use std::collections::HashMap;
use std::marker::PhantomData;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::utils::ddb::{add_filter_expr, from_ddb, item_to_value, parse_item, to_ddb_page};

// DDBTable stores serde entities as DynamoDB items keyed by `pk`, with a single
// global secondary index over `gsi_pk` and `gsi_sk`.
#[derive(Debug)]
pub(crate) struct DDBTable<T> {
    client: Client,
    table_name: String,
    index_name: String,
    pk: String,
    gsi_pk: String,
    gsi_sk: String,
    entity: PhantomData<fn() -> T>,
}

impl<T> DDBTable<T> where T: Identifiable + Serialize + DeserializeOwned {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str,
                      pk: &str, gsi_pk: &str, gsi_sk: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            pk: pk.to_string(),
            gsi_pk: gsi_pk.to_string(),
            gsi_sk: gsi_sk.to_string(),
            entity: PhantomData,
        }
    }

    pub(crate) async fn create(&self, entity: &T) -> LibraryResult<usize> {
        let item = parse_item(serde_json::to_value(entity)?)?;
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression(format!("attribute_not_exists({})", self.pk))
            .set_item(Some(item))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // replaces the whole item as long as nobody wrote it since `entity` was read
    pub(crate) async fn update(&self, entity: &T) -> LibraryResult<usize> {
        let mut item = parse_item(serde_json::to_value(entity)?)?;
        item.insert("version".to_string(), AttributeValue::N((entity.version() + 1).to_string()));
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .set_item(Some(item))
            .condition_expression("attribute_exists(#version) AND #version = :old_version")
            .expression_attribute_names("#version", "version")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version().to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    pub(crate) async fn get(&self, id: &str) -> LibraryResult<T> {
        let out = self.client
            .get_item()
            .table_name(self.table_name.as_str())
            .key(self.pk.as_str(), AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await?;
        match out.item() {
            Some(map) => Ok(serde_json::from_value(item_to_value(map))?),
            None => Err(LibraryError::not_found(format!("{} not found for {}", self.table_name, id).as_str())),
        }
    }

    pub(crate) async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let out = self.client.delete_item()
            .table_name(self.table_name.as_str())
            .key(self.pk.as_str(), AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await?;
        Ok(out.attributes().map(|_| 1).unwrap_or(0))
    }

    // the index partition key must be part of the predicate; everything else becomes a filter
    pub(crate) async fn query(&self, predicate: &HashMap<String, String>,
                              page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<T>> {
        let partition = predicate.get(self.gsi_pk.as_str()).ok_or_else(|| LibraryError::validation(
            format!("{} can only be queried by {}", self.table_name, self.gsi_pk).as_str(), None))?;
        let exclusive_start_key = to_ddb_page(page, predicate);
        let mut request = self.client
            .query()
            .table_name(self.table_name.as_str())
            .index_name(self.index_name.as_str())
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .expression_attribute_names("#gsi_pk", self.gsi_pk.as_str())
            .expression_attribute_values(":gsi_pk", AttributeValue::S(partition.to_string()));
        let mut key_cond = "#gsi_pk = :gsi_pk".to_string();
        if let Some(sort) = predicate.get(self.gsi_sk.as_str()) {
            key_cond.push_str(" AND #gsi_sk = :gsi_sk");
            request = request
                .expression_attribute_names("#gsi_sk", self.gsi_sk.as_str())
                .expression_attribute_values(":gsi_sk", AttributeValue::S(sort.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if *k != self.gsi_pk && *k != self.gsi_sk {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request
                    .expression_attribute_names(format!("#{}", ks), ks.as_str())
                    .expression_attribute_values(format!(":{}", ks), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        let out = request.send().await?;
        let mut records = vec![];
        for item in out.items().unwrap_or_default() {
            records.push(serde_json::from_value(item_to_value(item))?);
        }
        Ok(from_ddb(page, page_size, out.last_evaluated_key(), records))
    }
}
