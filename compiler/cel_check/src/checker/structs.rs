//! Message construction: `pkg.Msg{field: value}`.

use cel_diagnostic::ErrorCode;
use cel_ir::{Expr, ExprId, ExprKind, FieldEntry};
use cel_types::{Type, DURATION_TYPE_NAME, TIMESTAMP_TYPE_NAME};

use super::ExprChecker;
use crate::Reference;

impl ExprChecker<'_> {
    pub(super) fn check_struct(
        &mut self,
        id: ExprId,
        message_name: &str,
        fields: &[FieldEntry],
    ) -> Expr {
        let (name, message) = match self.env.lookup_ident(self.container, message_name) {
            Some(decl) => {
                self.set_reference(id, Reference::ident(decl.name.clone(), None));
                let message = self.message_type(id, &decl.name, &decl.ty);
                let name = if self.env.options().namespaced_declarations {
                    decl.name
                } else {
                    message_name.to_owned()
                };
                (name, message)
            }
            None => {
                self.report_undeclared(id, message_name);
                (message_name.to_owned(), None)
            }
        };
        let result = match &message {
            Some((_, ty)) => ty.clone(),
            None => Type::Error,
        };
        self.set_type(id, result);

        let fields = fields
            .iter()
            .map(|entry| {
                let message = message.as_ref().map(|(name, _)| name.as_str());
                self.check_field_entry(entry, message)
            })
            .collect();
        Expr::new(
            id,
            ExprKind::Struct {
                message_name: name,
                fields,
            },
        )
    }

    /// The message a resolved struct literal name denotes, as its schema
    /// name and its type. Reports names that are not message types.
    fn message_type(&mut self, id: ExprId, name: &str, ty: &Type) -> Option<(String, Type)> {
        let denoted = match ty {
            Type::Error => return None,
            Type::TypeOf(denoted) => &**denoted,
            _ => {
                self.report(ErrorCode::E2007, id, format!("'{name}' is not a type"));
                return None;
            }
        };
        match denoted {
            Type::Struct(message) => Some((message.clone(), denoted.clone())),
            Type::Duration => Some((DURATION_TYPE_NAME.to_owned(), Type::Duration)),
            Type::Timestamp => Some((TIMESTAMP_TYPE_NAME.to_owned(), Type::Timestamp)),
            other => {
                let message = format!("'{}' is not a message type", self.display(other));
                self.report(ErrorCode::E2008, id, message);
                None
            }
        }
    }

    /// Check one initializer. `message` is `None` once the literal itself
    /// failed to resolve, and then only the value is checked.
    fn check_field_entry(&mut self, entry: &FieldEntry, message: Option<&str>) -> FieldEntry {
        let value = self.check(&entry.value);
        let mut value_ty = self.get_type(value.id);
        if entry.optional {
            value_ty = self.unwrap_optional_value(value.id, value_ty);
        }

        if let Some(message) = message {
            let field_ty = self.field_type(entry.id, message, &entry.field);
            if !self.ctx.is_assignable(&value_ty, &field_ty) {
                let text = format!(
                    "expected type of field '{}' is '{}' but provided type is '{}'",
                    entry.field,
                    self.display(&field_ty),
                    self.display(&value_ty)
                );
                self.report(ErrorCode::E2011, entry.id, text);
            }
        }

        FieldEntry {
            id: entry.id,
            field: entry.field.clone(),
            value,
            optional: entry.optional,
        }
    }
}
