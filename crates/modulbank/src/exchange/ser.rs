//! Serde Serializer для секций документа обмена.
//!
//! Поля структуры собираются в порядке объявления, затем печатаются строками
//! `Имя=Значение` в два прохода: сначала обязательные поля (всегда, даже
//! пустые), затем заполненные необязательные.

use serde::ser::{self, Serialize};

use super::error::{Error, Result};

/// Поля секции в порядке объявления: имя и отформатированное значение.
pub type Fields = Vec<(&'static str, Option<String>)>;

/// Сериализует секцию и печатает её с учётом списка обязательных полей.
pub fn to_string<T: ?Sized + Serialize>(value: &T, mandatory: &[&str]) -> Result<String> {
    let mut serializer = SectionSerializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.render(mandatory))
}

/// Сериализует секцию без печати.
pub fn to_fields<T: ?Sized + Serialize>(value: &T) -> Result<Fields> {
    let mut serializer = SectionSerializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.fields)
}

/// Собирает пары из имени поля и отформатированного значения.
#[derive(Debug, Default)]
pub struct SectionSerializer {
    fields: Fields,
}

impl SectionSerializer {
    /// Создаёт пустой serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Печатает собранные поля.
    pub fn render(&self, mandatory: &[&str]) -> String {
        let mut output = String::new();

        for &name in mandatory {
            let value = self
                .fields
                .iter()
                .find(|(field, _)| *field == name)
                .and_then(|(_, value)| value.as_deref())
                .unwrap_or_default();
            push_line(&mut output, name, value);
        }

        for (name, value) in &self.fields {
            if mandatory.contains(name) {
                continue;
            }
            if let Some(value) = value {
                push_line(&mut output, name, value);
            }
        }

        output
    }
}

fn push_line(output: &mut String, name: &str, value: &str) {
    output.push_str(name);
    output.push('=');
    output.push_str(value);
    output.push('\n');
}

impl<'a> ser::Serializer for &'a mut SectionSerializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = ser::Impossible<(), Error>;
    type SerializeTupleStruct = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = SectionStructSerializer<'a>;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_none(self) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::ExpectedStruct)
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.fields.reserve(len);
        Ok(SectionStructSerializer { ser: self })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::ExpectedStruct)
    }
}

/// Записывает поля структуры-секции.
pub struct SectionStructSerializer<'a> {
    ser: &'a mut SectionSerializer,
}

impl ser::SerializeStruct for SectionStructSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        // Ошибка из `Serialize` значения относится к этому полю
        let formatted = value
            .serialize(ValueSerializer { field: key })
            .map_err(|err| match err {
                Error::Message(reason) => Error::Format { field: key, reason },
                other => other,
            })?;
        self.ser.fields.push((key, formatted));
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Форматирует значение одного поля: `None` для отсутствующего значения.
struct ValueSerializer {
    field: &'static str,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = ser::Impossible<Option<String>, Error>;
    type SerializeTuple = ser::Impossible<Option<String>, Error>;
    type SerializeTupleStruct = ser::Impossible<Option<String>, Error>;
    type SerializeTupleVariant = ser::Impossible<Option<String>, Error>;
    type SerializeMap = ser::Impossible<Option<String>, Error>;
    type SerializeStruct = ser::Impossible<Option<String>, Error>;
    type SerializeStructVariant = ser::Impossible<Option<String>, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Option<String>> {
        Err(Error::UnsupportedType("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Option<String>> {
        Err(Error::UnsupportedType("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Option<String>> {
        Err(Error::UnsupportedType("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Option<String>> {
        Err(Error::UnsupportedType("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Option<String>> {
        Err(Error::UnsupportedType("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Option<String>> {
        Err(Error::UnsupportedType("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Option<String>> {
        Err(Error::UnsupportedType("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Option<String>> {
        Err(Error::UnsupportedType("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Option<String>> {
        Err(Error::UnsupportedType("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Option<String>> {
        Err(Error::UnsupportedType("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Option<String>> {
        Err(Error::UnsupportedType("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<Option<String>> {
        Err(Error::UnsupportedType("char"))
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>> {
        // Перевод строки внутри значения разорвал бы строку `Имя=Значение`
        if v.contains(['\n', '\r']) {
            return Err(Error::Format {
                field: self.field,
                reason: "value contains a line break".to_owned(),
            });
        }
        Ok(Some(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<String>> {
        Err(Error::UnsupportedType("bytes"))
    }

    fn serialize_none(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Option<String>> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>> {
        Err(Error::UnsupportedType("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<String>> {
        Err(Error::UnsupportedType("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Option<String>> {
        Err(Error::UnsupportedType("unit variant"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<Option<String>> {
        Err(Error::UnsupportedType("newtype struct"))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>> {
        Err(Error::UnsupportedType("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::UnsupportedType("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::UnsupportedType("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::UnsupportedType("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::UnsupportedType("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::UnsupportedType("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::UnsupportedType("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::UnsupportedType("struct variant"))
    }
}
