use crate::Order;
use std::sync::Arc;

/// The physical columns of the document table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Kind,
    Id,
    ParentKind,
    ParentId,
    UniqueStringKey,
    StringKey,
    NumericKey,
    TimeKey,
    Data,
    CreateTime,
    UpdateTime,
}

impl Column {
    pub const fn name(&self) -> &'static str {
        match self {
            Column::Kind => "kind",
            Column::Id => "id",
            Column::ParentKind => "parent_kind",
            Column::ParentId => "parent_id",
            Column::UniqueStringKey => "unique_string_key",
            Column::StringKey => "string_key",
            Column::NumericKey => "numeric_key",
            Column::TimeKey => "time_key",
            Column::Data => "data",
            Column::CreateTime => "create_time",
            Column::UpdateTime => "update_time",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "kind" => Column::Kind,
            "id" => Column::Id,
            "parent_kind" => Column::ParentKind,
            "parent_id" => Column::ParentId,
            "unique_string_key" => Column::UniqueStringKey,
            "string_key" => Column::StringKey,
            "numeric_key" => Column::NumericKey,
            "time_key" => Column::TimeKey,
            "data" => Column::Data,
            "create_time" => Column::CreateTime,
            "update_time" => Column::UpdateTime,
            _ => return None,
        })
    }
}

/// Column that can only be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectColumn(Column);

/// Column that can only be filtered or ordered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhereColumn(Column);

/// Column usable both as a select target and in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectWhereColumn(Column);

pub const KIND: SelectWhereColumn = SelectWhereColumn(Column::Kind);
pub const ID: SelectWhereColumn = SelectWhereColumn(Column::Id);
pub const PARENT_KIND: SelectWhereColumn = SelectWhereColumn(Column::ParentKind);
pub const PARENT_ID: SelectWhereColumn = SelectWhereColumn(Column::ParentId);
pub const UNIQUE_STRING_KEY: WhereColumn = WhereColumn(Column::UniqueStringKey);
pub const STRING_KEY: WhereColumn = WhereColumn(Column::StringKey);
pub const NUMERIC_KEY: WhereColumn = WhereColumn(Column::NumericKey);
pub const TIME_KEY: WhereColumn = WhereColumn(Column::TimeKey);
pub const DATA: SelectColumn = SelectColumn(Column::Data);
pub const CREATE_TIME: SelectWhereColumn = SelectWhereColumn(Column::CreateTime);
pub const UPDATE_TIME: SelectWhereColumn = SelectWhereColumn(Column::UpdateTime);

/// One step of a nested payload path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(i64),
}

/// A location inside the payload column.
///
/// The steps are kept as data and rendered by the dialect when the statement is compiled.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PathField {
    steps: Arc<[PathStep]>,
}

impl PathField {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_keys<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            steps: keys.into_iter().map(|k| PathStep::Key(k.into())).collect(),
        }
    }
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(PathStep::Key(key.into()))
    }
    pub fn index(&self, index: i64) -> Self {
        self.push(PathStep::Index(index))
    }
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
    fn push(&self, step: PathStep) -> Self {
        Self {
            steps: self.steps.iter().cloned().chain([step]).collect(),
        }
    }
}

/// Anything that can be filtered or ordered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Column(Column),
    Path(PathField),
}

/// Anything that can appear in a select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectItem {
    Column(Column),
    /// `count(*) AS count`
    Count,
}

impl SelectItem {
    /// Label of the column in the result set.
    pub fn label(&self) -> &'static str {
        match self {
            SelectItem::Column(column) => column.name(),
            SelectItem::Count => "count",
        }
    }
}

pub trait WhereField {
    fn into_field(self) -> Field;
    fn asc(self) -> Order
    where
        Self: Sized,
    {
        Order::new(self.into_field(), false)
    }
    fn desc(self) -> Order
    where
        Self: Sized,
    {
        Order::new(self.into_field(), true)
    }
}

pub trait SelectField {
    fn into_select_item(self) -> SelectItem;
}

impl WhereField for WhereColumn {
    fn into_field(self) -> Field {
        Field::Column(self.0)
    }
}

impl WhereField for SelectWhereColumn {
    fn into_field(self) -> Field {
        Field::Column(self.0)
    }
}

impl WhereField for PathField {
    fn into_field(self) -> Field {
        Field::Path(self)
    }
}

impl WhereField for &PathField {
    fn into_field(self) -> Field {
        Field::Path(self.clone())
    }
}

impl WhereField for Field {
    fn into_field(self) -> Field {
        self
    }
}

impl SelectField for SelectColumn {
    fn into_select_item(self) -> SelectItem {
        SelectItem::Column(self.0)
    }
}

impl SelectField for SelectWhereColumn {
    fn into_select_item(self) -> SelectItem {
        SelectItem::Column(self.0)
    }
}

impl SelectField for SelectItem {
    fn into_select_item(self) -> SelectItem {
        self
    }
}

impl From<SelectColumn> for SelectItem {
    fn from(value: SelectColumn) -> Self {
        value.into_select_item()
    }
}

impl From<SelectWhereColumn> for SelectItem {
    fn from(value: SelectWhereColumn) -> Self {
        value.into_select_item()
    }
}

pub const DEFAULT_SELECT: &[SelectItem] = &[
    SelectItem::Column(Column::Kind),
    SelectItem::Column(Column::Id),
    SelectItem::Column(Column::ParentKind),
    SelectItem::Column(Column::ParentId),
    SelectItem::Column(Column::Data),
    SelectItem::Column(Column::CreateTime),
    SelectItem::Column(Column::UpdateTime),
];
