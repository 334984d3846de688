//! Deterministic type-stripping preprocessor for the typed JS superset.
//!
//! Removes type-only syntax so the plain JavaScript grammar can parse the
//! result without implementing the full typed grammar. Stripped regions are
//! blanked with spaces and newlines are kept, so byte offsets and line
//! numbers in the stripped output match the original source.
//!
//! Handled: type-only imports and import specifiers, interface bodies, type
//! aliases, enum bodies, `declare` blocks, generic parameter lists on
//! declarations, return and parameter type annotations, optional-parameter
//! markers, `as` casts (including `as const`), non-null assertions,
//! angle-bracket casts (non-JSX sources only), `readonly` / access-modifier /
//! `abstract` keywords, and `implements` clauses.

/// Brace group classification, used to decide whether a `:` is a type
/// annotation or an object-literal property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Paren,
    Bracket,
    Block,
    Object,
    ClassBody,
}

struct Stripper {
    buf: Vec<u8>,
    /// Open-group stack with a ternary counter per group (`?` awaiting `:`)
    groups: Vec<(Group, usize)>,
    /// Ternary counter for the top level, outside any group
    top_ternary: usize,
    /// A `class` header has been seen; the next block brace is its body
    class_header: bool,
    /// A `case`/`default` keyword is awaiting its colon
    pending_case: bool,
    jsx: bool,
}

/// Strip typed-superset syntax from `source`. `jsx` disables angle-bracket
/// cast removal, which would otherwise eat JSX elements.
pub fn strip_types(source: &str, jsx: bool) -> String {
    let mut stripper = Stripper {
        buf: source.as_bytes().to_vec(),
        groups: Vec::new(),
        top_ternary: 0,
        class_header: false,
        pending_case: false,
        jsx,
    };
    stripper.run();
    // Blanked bytes are ASCII spaces and untouched bytes come from the input,
    // so the buffer is still valid UTF-8.
    String::from_utf8(stripper.buf).unwrap_or_else(|e| {
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}

const KEYWORDS_BEFORE_EXPR: &[&str] = &[
    "return",
    "typeof",
    "case",
    "in",
    "of",
    "delete",
    "void",
    "await",
    "yield",
    "do",
    "else",
    "instanceof",
    "new",
    "throw",
];

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

impl Stripper {
    fn run(&mut self) {
        let mut i = 0usize;
        while i < self.buf.len() {
            let b = self.buf[i];
            match b {
                b'"' | b'\'' => i = self.skip_string(i),
                b'`' => i = self.skip_template(i),
                b'/' if self.peek(i + 1) == Some(b'/') => i = self.skip_line_comment(i),
                b'/' if self.peek(i + 1) == Some(b'*') => i = self.skip_block_comment(i),
                b'/' if self.regex_can_start(i) => i = self.skip_regex(i),
                b'(' => {
                    self.groups.push((Group::Paren, 0));
                    i += 1;
                }
                b'[' => {
                    self.groups.push((Group::Bracket, 0));
                    i += 1;
                }
                b'{' => {
                    let group = self.classify_brace(i);
                    self.groups.push((group, 0));
                    i += 1;
                }
                b')' | b']' | b'}' => {
                    self.groups.pop();
                    i += 1;
                }
                b'?' => i = self.handle_question(i),
                b'!' => i = self.handle_bang(i),
                b':' => i = self.handle_colon(i),
                b'<' => i = self.handle_angle(i),
                _ if is_ident_start(b) && !self.prev_is_ident(i) => i = self.handle_word(i),
                _ => i += 1,
            }
        }
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.buf.get(i).copied()
    }

    fn prev_is_ident(&self, i: usize) -> bool {
        i > 0 && is_ident_byte(self.buf[i - 1])
    }

    fn blank(&mut self, start: usize, end: usize) {
        let end = end.min(self.buf.len());
        for b in &mut self.buf[start..end] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    }

    fn skip_ws(&self, mut i: usize) -> usize {
        while i < self.buf.len() && self.buf[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    fn prev_meaningful(&self, i: usize) -> Option<u8> {
        let mut j = i;
        while j > 0 {
            j -= 1;
            let b = self.buf[j];
            if !b.is_ascii_whitespace() {
                return Some(b);
            }
        }
        None
    }

    /// Word ending immediately before position `i` (skipping whitespace).
    fn prev_word(&self, i: usize) -> Option<String> {
        let mut end = i;
        while end > 0 && self.buf[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && is_ident_byte(self.buf[start - 1]) {
            start -= 1;
        }
        if start == end {
            return None;
        }
        Some(String::from_utf8_lossy(&self.buf[start..end]).into_owned())
    }

    fn word_at(&self, i: usize) -> (String, usize) {
        let mut end = i;
        while end < self.buf.len() && is_ident_byte(self.buf[end]) {
            end += 1;
        }
        (
            String::from_utf8_lossy(&self.buf[i..end]).into_owned(),
            end,
        )
    }

    fn skip_string(&self, start: usize) -> usize {
        let quote = self.buf[start];
        let mut i = start + 1;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\\' => i += 2,
                b'\n' => return i + 1, // unterminated on this line
                b if b == quote => return i + 1,
                _ => i += 1,
            }
        }
        i
    }

    fn skip_template(&self, start: usize) -> usize {
        let mut i = start + 1;
        let mut brace_depth = 0usize;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\\' => i += 2,
                b'$' if self.peek(i + 1) == Some(b'{') => {
                    brace_depth += 1;
                    i += 2;
                }
                b'}' if brace_depth > 0 => {
                    brace_depth -= 1;
                    i += 1;
                }
                b'`' if brace_depth == 0 => return i + 1,
                _ => i += 1,
            }
        }
        i
    }

    fn skip_line_comment(&self, start: usize) -> usize {
        let mut i = start;
        while i < self.buf.len() && self.buf[i] != b'\n' {
            i += 1;
        }
        i
    }

    fn skip_block_comment(&self, start: usize) -> usize {
        let mut i = start + 2;
        while i + 1 < self.buf.len() {
            if self.buf[i] == b'*' && self.buf[i + 1] == b'/' {
                return i + 2;
            }
            i += 1;
        }
        self.buf.len()
    }

    fn regex_can_start(&self, i: usize) -> bool {
        match self.prev_meaningful(i) {
            None => true,
            Some(b) if b"=([{,;:!&|?+-*%<>~^".contains(&b) => true,
            Some(_) => self
                .prev_word(i)
                .map(|w| KEYWORDS_BEFORE_EXPR.contains(&w.as_str()))
                .unwrap_or(false),
        }
    }

    fn skip_regex(&self, start: usize) -> usize {
        let mut i = start + 1;
        let mut in_class = false;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\\' => i += 2,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => return i + 1,
                b'\n' => return i, // not a regex after all; bail out
                _ => i += 1,
            }
        }
        i
    }

    fn classify_brace(&mut self, i: usize) -> Group {
        if self.class_header {
            self.class_header = false;
            return Group::ClassBody;
        }
        match self.prev_meaningful(i) {
            Some(b')') => Group::Block,
            Some(b'>') if self.buf_prev_is_arrow(i) => Group::Block,
            Some(b'=') | Some(b'(') | Some(b'[') | Some(b',') | Some(b':') | Some(b'?')
            | Some(b'&') | Some(b'|') | Some(b'<') => Group::Object,
            Some(b) if is_ident_byte(b) => {
                match self.prev_word(i).as_deref() {
                    Some("return") | Some("in") | Some("of") | Some("typeof") => Group::Object,
                    Some("do") | Some("else") | Some("try") | Some("finally") => Group::Block,
                    // `function name {`? not valid; identifier before `{` is
                    // most often a label/keyword context — treat as block.
                    _ => Group::Block,
                }
            }
            _ => Group::Block,
        }
    }

    fn buf_prev_is_arrow(&self, i: usize) -> bool {
        let mut j = i;
        while j > 0 && self.buf[j - 1].is_ascii_whitespace() {
            j -= 1;
        }
        j >= 2 && self.buf[j - 1] == b'>' && self.buf[j - 2] == b'='
    }

    fn ternary_counter(&mut self) -> &mut usize {
        match self.groups.last_mut() {
            Some((_, counter)) => counter,
            None => &mut self.top_ternary,
        }
    }

    fn handle_question(&mut self, i: usize) -> usize {
        let next = self.peek(i + 1);
        if next == Some(b'.') || next == Some(b'?') {
            // optional chaining / nullish coalescing
            return i + 2;
        }
        let after = self.skip_ws(i + 1);
        match self.peek(after) {
            // Optional marker: `x?: T`, `x?)` and `x?,` in parameter lists.
            // `?` before `(` stays: that is a ternary with a parenthesized
            // branch.
            Some(b':') | Some(b')') | Some(b',') => {
                self.blank(i, i + 1);
                i + 1
            }
            _ => {
                *self.ternary_counter() += 1;
                i + 1
            }
        }
    }

    fn handle_bang(&mut self, i: usize) -> usize {
        if self.peek(i + 1) == Some(b'=') {
            return i + 2;
        }
        let prev_ok = matches!(self.prev_meaningful(i), Some(b) if is_ident_byte(b) || b == b')' || b == b']');
        let prev_is_keyword = self
            .prev_word(i)
            .map(|w| KEYWORDS_BEFORE_EXPR.contains(&w.as_str()))
            .unwrap_or(false);
        if prev_ok && !prev_is_keyword {
            // non-null assertion
            self.blank(i, i + 1);
        }
        i + 1
    }

    fn handle_colon(&mut self, i: usize) -> usize {
        if self.pending_case {
            self.pending_case = false;
            return i + 1;
        }
        let counter = self.ternary_counter();
        if *counter > 0 {
            *counter -= 1;
            return i + 1;
        }
        let group = self.groups.last().map(|(g, _)| *g);
        let annotation = match group {
            Some(Group::Object) | Some(Group::Bracket) => false,
            Some(Group::Paren) => true,
            Some(Group::Block) | Some(Group::ClassBody) | None => matches!(
                self.prev_meaningful(i),
                Some(b) if is_ident_byte(b) || b == b')' || b == b']'
            ),
        };
        if !annotation {
            return i + 1;
        }
        let return_type = self.prev_meaningful(i) == Some(b')');
        let end = self.scan_type_expr(i + 1, return_type);
        self.blank(i, end);
        end
    }

    /// Scan a type expression starting at `i`, returning the exclusive end.
    /// Terminates at depth 0 on `,` `;` `)` `]` `}`, on `=` (unless part of a
    /// function-type arrow inside the annotation), and for return types on
    /// the `{` opening the function body.
    fn scan_type_expr(&self, mut i: usize, return_type: bool) -> usize {
        let mut depth = 0usize;
        let start = self.skip_ws(i);
        let mut first = true;
        while i < self.buf.len() {
            let b = self.buf[i];
            match b {
                b'"' | b'\'' => {
                    i = self.skip_string(i);
                    first = false;
                    continue;
                }
                b'(' | b'[' | b'<' => {
                    depth += 1;
                    first = false;
                }
                b'{' => {
                    if depth == 0 && !first && i > start && return_type {
                        return i;
                    }
                    if depth == 0 && i == start {
                        first = false;
                    }
                    depth += 1;
                }
                b')' | b']' | b'>' | b'}' => {
                    if depth == 0 {
                        return i;
                    }
                    depth -= 1;
                }
                b',' | b';' if depth == 0 => return i,
                b'=' if depth == 0 => {
                    if self.peek(i + 1) == Some(b'>') {
                        if return_type {
                            return i; // arrow body follows
                        }
                        i += 2; // function type arrow, part of the annotation
                        continue;
                    }
                    return i;
                }
                b'\n' if depth == 0 => {
                    // Types end at the line unless the next line continues a
                    // union/intersection.
                    let next = self.skip_ws(i + 1);
                    match self.peek(next) {
                        Some(b'|') | Some(b'&') => {}
                        _ => return i,
                    }
                }
                _ => {
                    if !b.is_ascii_whitespace() {
                        first = false;
                    }
                }
            }
            i += 1;
        }
        i
    }

    fn handle_angle(&mut self, i: usize) -> usize {
        // `<<`, `<=` are operators
        if matches!(self.peek(i + 1), Some(b'<') | Some(b'=')) {
            return i + 2;
        }
        let Some(end) = self.matching_angle(i) else {
            return i + 1;
        };
        let after = self.skip_ws(end + 1);
        let prev = self.prev_meaningful(i);
        let prev_is_expr = matches!(prev, Some(b) if is_ident_byte(b))
            && !self
                .prev_word(i)
                .map(|w| KEYWORDS_BEFORE_EXPR.contains(&w.as_str()))
                .unwrap_or(false);

        if prev_is_expr {
            // Generic argument/parameter list on a declaration or call:
            // `name<T>(…)`, `class C<T> {`, `extends Base<T> {`.
            if matches!(self.peek(after), Some(b'(') | Some(b'{')) || self.word_is(after, "implements")
            {
                self.blank(i, end + 1);
                return end + 1;
            }
            return i + 1;
        }

        // Angle-bracket cast `<T>expr` in expression position (non-JSX only).
        if !self.jsx {
            let cast_position = match prev {
                None => true,
                Some(b) if b"=(,;[!&|?{".contains(&b) => true,
                Some(_) => self
                    .prev_word(i)
                    .map(|w| w == "return")
                    .unwrap_or(false),
            };
            if cast_position && matches!(self.peek(after), Some(b) if is_ident_start(b) || b == b'(' || b == b'[' || b == b'{' || b == b'\'' || b == b'"')
            {
                self.blank(i, end + 1);
                return end + 1;
            }
        }
        i + 1
    }

    fn word_is(&self, i: usize, word: &str) -> bool {
        let (found, _) = self.word_at(i);
        found == word
    }

    /// Find the `>` matching the `<` at `i`, staying on a single statement.
    fn matching_angle(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = start;
        while i < self.buf.len() {
            match self.buf[i] {
                b'"' | b'\'' => {
                    i = self.skip_string(i);
                    continue;
                }
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                b';' | b'{' | b'}' => return None,
                b'=' if self.peek(i + 1) == Some(b'>') => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn handle_word(&mut self, i: usize) -> usize {
        let (word, end) = self.word_at(i);
        match word.as_str() {
            "import" => self.handle_import(i, end),
            "export" => self.handle_export(i, end),
            "interface" => self.blank_braced_decl(i, end),
            "enum" => self.blank_braced_decl(i, end),
            "const" if self.word_is(self.skip_ws(end), "enum") => {
                let (_, enum_end) = self.word_at(self.skip_ws(end));
                self.blank_braced_decl(i, enum_end)
            }
            "type" => self.handle_type_alias(i, end),
            "declare" => self.handle_declare(i, end),
            "implements" => self.handle_implements(i, end),
            "abstract" | "readonly" | "public" | "private" | "protected" | "override" => {
                self.handle_modifier(i, end)
            }
            "class" => {
                self.class_header = true;
                self.strip_decl_generics(end)
            }
            "function" => self.handle_function(end),
            "case" => {
                self.pending_case = true;
                end
            }
            "default" if self.prev_word(i).as_deref() != Some("export") => {
                self.pending_case = true;
                end
            }
            _ => end,
        }
    }

    /// Blank `function name<T>` generics (the parameter annotations are
    /// handled by the colon rules).
    fn handle_function(&mut self, end: usize) -> usize {
        let mut i = self.skip_ws(end);
        if self.peek(i) == Some(b'*') {
            i = self.skip_ws(i + 1);
        }
        i
    }

    /// After `class Name` / modifier chains, blank a generic parameter list.
    fn strip_decl_generics(&mut self, end: usize) -> usize {
        let name_start = self.skip_ws(end);
        let (_, name_end) = self.word_at(name_start);
        let maybe_angle = self.skip_ws(name_end);
        if self.peek(maybe_angle) == Some(b'<') {
            if let Some(close) = self.matching_angle(maybe_angle) {
                self.blank(maybe_angle, close + 1);
            }
        }
        end
    }

    fn handle_import(&mut self, start: usize, end: usize) -> usize {
        let stmt_end = self.import_statement_end(end);
        let after = self.skip_ws(end);
        if self.word_is(after, "type") {
            // `import type …` is erased wholesale.
            self.blank(start, stmt_end);
            return stmt_end;
        }
        self.blank_type_specifiers(end, stmt_end);
        stmt_end
    }

    fn handle_export(&mut self, start: usize, end: usize) -> usize {
        let after = self.skip_ws(end);
        if self.word_is(after, "type") {
            // `export type { A } from 'x';` or `export type X = …;`
            let (_, type_end) = self.word_at(after);
            let brace = self.skip_ws(type_end);
            if self.peek(brace) == Some(b'{') {
                let stmt_end = self.import_statement_end(end);
                self.blank(start, stmt_end);
                return stmt_end;
            }
            // Alias form: let the `type` handler measure it, then widen the
            // blank to cover `export`.
            let stmt_end = self.handle_type_alias(after, type_end);
            self.blank(start, stmt_end);
            return stmt_end;
        }
        end
    }

    /// End of an import/export-from statement: the first `;` at depth 0, or
    /// the end of the line holding the module specifier.
    fn import_statement_end(&self, mut i: usize) -> usize {
        let mut saw_source = false;
        while i < self.buf.len() {
            match self.buf[i] {
                b'"' | b'\'' => {
                    i = self.skip_string(i);
                    saw_source = true;
                    continue;
                }
                b';' => return i + 1,
                b'\n' if saw_source => return i,
                _ => i += 1,
            }
        }
        i
    }

    /// Blank `type Name` / `type Name as Alias` specifiers inside an import
    /// clause, together with one trailing comma.
    fn blank_type_specifiers(&mut self, start: usize, stmt_end: usize) {
        let mut i = start;
        while i < stmt_end {
            let b = self.buf[i];
            if is_ident_start(b) && !self.prev_is_ident(i) {
                let (word, word_end) = self.word_at(i);
                if word == "type" && self.in_braces_since(start, i) {
                    let mut spec_end = word_end;
                    loop {
                        spec_end = self.skip_ws(spec_end);
                        match self.peek(spec_end) {
                            Some(b) if is_ident_byte(b) => {
                                let (_, next) = self.word_at(spec_end);
                                spec_end = next;
                            }
                            _ => break,
                        }
                    }
                    let mut blank_end = spec_end;
                    let after = self.skip_ws(spec_end);
                    if self.peek(after) == Some(b',') {
                        blank_end = after + 1;
                    }
                    self.blank(i, blank_end);
                    i = blank_end;
                    continue;
                }
                i = word_end;
                continue;
            }
            if b == b'"' || b == b'\'' {
                i = self.skip_string(i);
                continue;
            }
            i += 1;
        }
    }

    fn in_braces_since(&self, start: usize, pos: usize) -> bool {
        let mut depth = 0isize;
        for &b in &self.buf[start..pos] {
            match b {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
        }
        depth > 0
    }

    /// Blank a declaration carrying a braced body (`interface X … { … }`,
    /// `enum X { … }`).
    fn blank_braced_decl(&mut self, start: usize, end: usize) -> usize {
        // Only a declaration when a name follows.
        let name = self.skip_ws(end);
        if !matches!(self.peek(name), Some(b) if is_ident_start(b)) {
            return end;
        }
        let Some(open) = self.find_open_brace(end) else {
            return end;
        };
        let close = self.matching_brace(open);
        self.blank(start, close);
        close
    }

    fn find_open_brace(&self, mut i: usize) -> Option<usize> {
        while i < self.buf.len() {
            match self.buf[i] {
                b'{' => return Some(i),
                b';' | b'(' | b')' => return None,
                b'"' | b'\'' => i = self.skip_string(i),
                _ => i += 1,
            }
        }
        None
    }

    /// Exclusive end of the brace group opening at `open`.
    fn matching_brace(&self, open: usize) -> usize {
        let mut depth = 0usize;
        let mut i = open;
        while i < self.buf.len() {
            match self.buf[i] {
                b'"' | b'\'' => {
                    i = self.skip_string(i);
                    continue;
                }
                b'`' => {
                    i = self.skip_template(i);
                    continue;
                }
                b'/' if self.peek(i + 1) == Some(b'/') => {
                    i = self.skip_line_comment(i);
                    continue;
                }
                b'/' if self.peek(i + 1) == Some(b'*') => {
                    i = self.skip_block_comment(i);
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.buf.len()
    }

    /// `type Name = …;` statements. Only fires in statement position with an
    /// identifier and `=` following, so `type` as a plain identifier is left
    /// alone.
    fn handle_type_alias(&mut self, start: usize, end: usize) -> usize {
        let name_start = self.skip_ws(end);
        if !matches!(self.peek(name_start), Some(b) if is_ident_start(b)) {
            return end;
        }
        let (_, name_end) = self.word_at(name_start);
        let mut i = self.skip_ws(name_end);
        if self.peek(i) == Some(b'<') {
            match self.matching_angle(i) {
                Some(close) => i = self.skip_ws(close + 1),
                None => return end,
            }
        }
        if self.peek(i) != Some(b'=') || self.peek(i + 1) == Some(b'>') {
            return end;
        }
        let type_end = self.scan_type_expr(i + 1, false);
        let stmt_end = if self.peek(type_end) == Some(b';') {
            type_end + 1
        } else {
            type_end
        };
        self.blank(start, stmt_end);
        stmt_end
    }

    fn handle_declare(&mut self, start: usize, end: usize) -> usize {
        let Some(open) = self.find_open_brace(end) else {
            // `declare const x: number;` — erase through the semicolon/line.
            let mut i = end;
            while i < self.buf.len() && self.buf[i] != b';' && self.buf[i] != b'\n' {
                i += 1;
            }
            let stop = if self.peek(i) == Some(b';') { i + 1 } else { i };
            self.blank(start, stop);
            return stop;
        };
        let close = self.matching_brace(open);
        self.blank(start, close);
        close
    }

    fn handle_implements(&mut self, start: usize, end: usize) -> usize {
        let mut i = end;
        while i < self.buf.len() && self.buf[i] != b'{' {
            i += 1;
        }
        self.blank(start, i);
        i
    }

    fn handle_modifier(&mut self, start: usize, end: usize) -> usize {
        // Only a modifier when followed by another word (member or parameter
        // name, or a further modifier).
        let after = self.skip_ws(end);
        if matches!(self.peek(after), Some(b) if is_ident_start(b)) {
            self.blank(start, end);
        }
        end
    }
}

/// Blank `as`-casts in an already-scanned source. Run as a second pass so the
/// main scanner does not have to disambiguate `as` inside import clauses
/// (those regions are already handled there).
pub fn strip_as_casts(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut stripper = Stripper {
        buf: bytes.to_vec(),
        groups: Vec::new(),
        top_ternary: 0,
        class_header: false,
        pending_case: false,
        jsx: true,
    };
    let mut i = 0usize;
    while i < stripper.buf.len() {
        let b = stripper.buf[i];
        match b {
            b'"' | b'\'' => i = stripper.skip_string(i),
            b'`' => i = stripper.skip_template(i),
            b'/' if stripper.peek(i + 1) == Some(b'/') => i = stripper.skip_line_comment(i),
            b'/' if stripper.peek(i + 1) == Some(b'*') => i = stripper.skip_block_comment(i),
            _ if is_ident_start(b) && !stripper.prev_is_ident(i) => {
                let (word, end) = stripper.word_at(i);
                if word == "as" {
                    let prev_ok = matches!(
                        stripper.prev_meaningful(i),
                        Some(b) if is_ident_byte(b) || b == b')' || b == b']' || b == b'"' || b == b'\'' || b == b'`'
                    );
                    let prev_is_star = stripper.prev_meaningful(i) == Some(b'*');
                    if prev_ok && !prev_is_star {
                        let type_end = stripper.scan_type_expr(end, false);
                        stripper.blank(i, type_end);
                        i = type_end;
                        continue;
                    }
                }
                i = end;
            }
            _ => i += 1,
        }
    }
    String::from_utf8(stripper.buf)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Full preprocessing pipeline for typed sources.
pub fn preprocess_typescript(source: &str, jsx: bool) -> String {
    strip_as_casts(&strip_types(source, jsx))
}
