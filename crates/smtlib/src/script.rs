use crate::command::Command;

/// An SMT-LIB script: a sequence of commands.
#[derive(Debug, Clone, Default)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn with_commands(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) {
        self.commands.extend(cmds);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the script already ends its query with a `(check-sat)`.
    pub fn has_check_sat(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::CheckSat))
    }

    /// Whether the script already requests a model.
    pub fn has_get_model(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::GetModel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;
    use crate::term::Term;

    #[test]
    fn new_creates_empty_script() {
        let script = Script::new();
        assert!(script.is_empty());
        assert_eq!(script.len(), 0);
    }

    #[test]
    fn push_preserves_order() {
        let mut script = Script::new();
        script.push(Command::SetLogic("QF_BV".to_string()));
        script.push(Command::DeclareConst("x".to_string(), Sort::BitVec(32)));
        script.push(Command::Assert(Term::eq(Term::var("x"), Term::bv(5, 32))));
        script.push(Command::CheckSat);

        let cmds = script.commands();
        assert!(matches!(&cmds[0], Command::SetLogic(l) if l == "QF_BV"));
        assert!(matches!(&cmds[1], Command::DeclareConst(n, Sort::BitVec(32)) if n == "x"));
        assert!(matches!(&cmds[2], Command::Assert(_)));
        assert!(matches!(&cmds[3], Command::CheckSat));
    }

    #[test]
    fn extend_adds_multiple_commands() {
        let mut script = Script::new();
        script.extend(vec![
            Command::SetLogic("QF_BV".to_string()),
            Command::CheckSat,
            Command::Exit,
        ]);
        assert_eq!(script.len(), 3);
    }

    #[test]
    fn has_check_sat_and_get_model() {
        let mut script = Script::new();
        assert!(!script.has_check_sat());
        assert!(!script.has_get_model());
        script.push(Command::CheckSat);
        script.push(Command::GetModel);
        assert!(script.has_check_sat());
        assert!(script.has_get_model());
    }

    #[test]
    fn with_commands_creates_script() {
        let script = Script::with_commands(vec![Command::CheckSat]);
        assert_eq!(script.len(), 1);
        assert!(!script.is_empty());
    }
}
