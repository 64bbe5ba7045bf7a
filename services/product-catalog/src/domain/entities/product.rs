//! 商品实体

use std::fmt;
use std::str::FromStr;

use catalog_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::domain::enums::Category;
use crate::domain::value_objects::ProductId;

/// 名称最大长度（字符）
pub const MAX_NAME_LEN: usize = 100;
/// 描述最大长度（字符）
pub const MAX_DESCRIPTION_LEN: usize = 250;

/// 价格列为 NUMERIC(14, 2)
const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 12;

/// 商品实体
///
/// `id` 在持久化前为 `None`，创建后由存储分配且不再改变。
/// 删除后对象仍可使用，但不再对应任何行。
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// 从存储中恢复已持久化的商品
    pub(crate) fn restore(
        id: ProductId,
        name: String,
        description: String,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            price,
            available,
            category,
        }
    }

    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: ProductId) {
        self.id = Some(id);
    }

    /// 校验字段是否满足表约束
    pub fn validate(&self) -> AppResult<()> {
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation(format!(
                "Invalid product: name exceeds {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::validation(format!(
                "Invalid product: description exceeds {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        validate_price(&self.price)
    }

    /// 序列化为 JSON 对象，价格以十进制字符串表示
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id.map(|id| id.0),
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }

    /// 从 JSON 对象更新字段（`id` 被忽略）
    ///
    /// 全部字段校验通过后才会写入，失败时对象保持不变。
    pub fn deserialize(&mut self, data: &Value) -> AppResult<&mut Self> {
        let object = data.as_object().ok_or_else(|| {
            AppError::validation("Invalid product: body of request contained bad or no data")
        })?;

        let name = string_field(object, "name")?;
        let description = string_field(object, "description")?;
        let price = parse_price(required(object, "price")?)?;

        let available = match required(object, "available")? {
            Value::Bool(b) => *b,
            other => {
                return Err(AppError::validation(format!(
                    "Invalid type for boolean [available]: {}",
                    json_type_name(other)
                )));
            }
        };

        let category = match required(object, "category")? {
            Value::String(s) => Category::from_str(s)?,
            other => {
                return Err(AppError::validation(format!(
                    "Invalid attribute: {}",
                    other
                )));
            }
        };

        self.name = name;
        self.description = description;
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(self)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> AppResult<&'a Value> {
    object
        .get(field)
        .ok_or_else(|| AppError::validation(format!("Invalid product: missing {}", field)))
}

fn string_field(object: &Map<String, Value>, field: &str) -> AppResult<String> {
    match required(object, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(AppError::validation(format!(
            "Invalid type for string [{}]: {}",
            field,
            json_type_name(other)
        ))),
    }
}

fn parse_price(value: &Value) -> AppResult<Decimal> {
    match value {
        Value::String(s) => parse_price_str(s),
        Value::Number(n) => parse_price_str(&n.to_string()),
        other => Err(AppError::validation(format!("Invalid price: {}", other))),
    }
}

/// 解析价格字符串，接受 `"12.50"`、`" 12.50 "` 与科学计数法 `"1.25e1"`
pub fn parse_price_str(text: &str) -> AppResult<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| AppError::validation(format!("Invalid price: {}", text)))
}

fn validate_price(price: &Decimal) -> AppResult<()> {
    if price.normalize().scale() > PRICE_SCALE {
        return Err(AppError::validation(format!(
            "Invalid price: {} has more than {} decimal places",
            price, PRICE_SCALE
        )));
    }
    if price.abs().trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(AppError::validation(format!("Invalid price: {} is out of range", price)));
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
