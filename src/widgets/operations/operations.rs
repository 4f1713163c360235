use crate::entities::operation::BinaryOp;
use crate::entities::session::Session;

/// Selections of the operations form.
///
/// Operand A is picked among the original docks, operand B among the
/// originals other than A. `refresh` keeps both valid as docks come and go.
#[derive(Debug, Clone)]
pub struct OperationsForm {
    pub op: BinaryOp,
    a: Option<String>,
    b: Option<String>,
    a_choices: Vec<String>,
    b_choices: Vec<String>,
}

impl Default for OperationsForm {
    fn default() -> Self {
        Self {
            op: BinaryOp::Difference,
            a: None,
            b: None,
            a_choices: Vec::new(),
            b_choices: Vec::new(),
        }
    }
}

impl OperationsForm {
    pub fn a(&self) -> Option<&str> {
        self.a.as_deref()
    }

    pub fn b(&self) -> Option<&str> {
        self.b.as_deref()
    }

    pub fn a_choices(&self) -> &[String] {
        &self.a_choices
    }

    pub fn b_choices(&self) -> &[String] {
        &self.b_choices
    }

    /// Re-read the operand lists from `session`.
    pub fn refresh(&mut self, session: &Session) {
        self.a_choices = session.operand_titles();
        if !self.a.as_ref().is_some_and(|a| self.a_choices.contains(a)) {
            self.a = self.a_choices.first().cloned();
        }
        self.refresh_b(session);
    }

    fn refresh_b(&mut self, session: &Session) {
        self.b_choices = match &self.a {
            Some(a) => session.operand_b_choices(a),
            None => Vec::new(),
        };
        // the previous B survives a change of A when it is still offered
        if !self.b.as_ref().is_some_and(|b| self.b_choices.contains(b)) {
            self.b = self.b_choices.first().cloned();
        }
    }

    pub fn select_a(&mut self, title: &str, session: &Session) {
        if self.a_choices.iter().any(|t| t == title) {
            self.a = Some(title.to_string());
            self.refresh_b(session);
        }
    }

    pub fn select_b(&mut self, title: &str) {
        if self.b_choices.iter().any(|t| t == title) {
            self.b = Some(title.to_string());
        }
    }

    /// `(op, a, b)` when both operands are chosen.
    pub fn request(&self) -> Option<(BinaryOp, String, String)> {
        Some((self.op, self.a.clone()?, self.b.clone()?))
    }
}
