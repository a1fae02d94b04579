// A small backtracking scanner over any iterator of clonable items.
// Items are pulled from the source lazily and buffered so that a failed
// match can rewind to a saved position.
pub struct Scanner<I: Iterator>
where
    I::Item: Clone,
{
    src: I,
    buf: Vec<I::Item>,
    pos: isize,
}

impl<I> Iterator for Scanner<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        self.pos += 1;
        let lacking = self.pos - (self.buf.len() as isize) + 1;
        if lacking > 0 {
            self.buf.extend(self.src.by_ref().take(lacking as usize));
        }
        // never move past one slot beyond the buffered items
        self.pos = std::cmp::min(self.pos, self.buf.len() as isize);
        self.current()
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    // Drops any leading whitespace, returns true if something was skipped
    pub fn skip_whitespace(&mut self) -> bool {
        let skipped = self.skip_while(|c| c.is_whitespace());
        self.extract();
        skipped
    }

    // scan a maximal run of non-whitespace chars
    pub fn scan_word(&mut self) -> Option<String> {
        if !self.skip_while(|c| !c.is_whitespace()) {
            return None;
        }
        Some(self.extract_string())
    }

    // scan numbers like [+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?
    pub fn scan_number(&mut self) -> Option<String> {
        let start = self.buffer_pos();
        self.accept_any(&['+', '-']);
        if self.skip_while(|c| c.is_ascii_digit()) {
            // trailing fraction digits are optional: "3." is a number
            if self.accept(&'.').is_some() {
                self.skip_while(|c| c.is_ascii_digit());
            }
        } else if self.accept(&'.').is_none() || !self.skip_while(|c| c.is_ascii_digit()) {
            self.set_buffer_pos(start);
            return None;
        }
        let backtrack = self.buffer_pos();
        if self.accept_any(&['e', 'E']).is_some() {
            self.accept_any(&['+', '-']);
            if !self.skip_while(|c| c.is_ascii_digit()) {
                self.set_buffer_pos(backtrack);
            }
        }
        Some(self.extract_string())
    }
}

impl<I> Scanner<I>
where
    I: Iterator,
    I::Item: Clone,
{
    pub fn new(source: I) -> Scanner<I> {
        Scanner {
            src: source,
            buf: Vec::new(),
            pos: -1,
        }
    }

    pub fn buffer_pos(&self) -> isize {
        self.pos
    }

    // Rewind to a position obtained from buffer_pos.
    // Out of bounds positions are refused and reported with false.
    pub fn set_buffer_pos(&mut self, pos: isize) -> bool {
        if pos < -1 || pos > (self.buf.len() as isize) {
            return false;
        }
        self.pos = pos;
        true
    }

    pub fn current(&self) -> Option<I::Item> {
        let pos = self.pos as usize;
        if self.pos < 0 || pos >= self.buf.len() {
            return None;
        }
        Some(self.buf[pos].clone())
    }

    // Look one item ahead without advancing
    pub fn peek(&mut self) -> Option<I::Item> {
        let backtrack = self.pos;
        let peeked = self.next();
        self.pos = backtrack;
        peeked
    }

    // Hand out everything up to the cursor and restart from the remainder
    pub fn extract(&mut self) -> Vec<I::Item> {
        let split_point = std::cmp::min(self.pos + 1, self.buf.len() as isize);
        assert!(split_point >= 0);
        self.pos = -1;
        let mut remaining = self.buf.split_off(split_point as usize);
        std::mem::swap(&mut self.buf, &mut remaining);
        remaining
    }

    // Advance only if the next item satisfies pred
    pub fn accept_if(&mut self, pred: impl Fn(&I::Item) -> bool) -> Option<I::Item> {
        let backtrack = self.buffer_pos();
        if let Some(next) = self.next() {
            if pred(&next) {
                return Some(next);
            }
        }
        self.set_buffer_pos(backtrack);
        None
    }

    // Advance over every item satisfying pred, true if anything matched
    pub fn skip_while(&mut self, pred: impl Fn(&I::Item) -> bool) -> bool {
        let mut advanced = false;
        while self.accept_if(&pred).is_some() {
            advanced = true;
        }
        advanced
    }
}

impl<I> Scanner<I>
where
    I: Iterator,
    I::Item: Clone + PartialEq,
{
    pub fn accept(&mut self, what: &I::Item) -> Option<I::Item> {
        self.accept_if(|next| next == what)
    }

    pub fn accept_any(&mut self, any: &[I::Item]) -> Option<I::Item> {
        self.accept_if(|next| any.contains(next))
    }
}

#[cfg(test)]
mod tests {
    use super::Scanner;

    #[test]
    fn test_scan_words() {
        let mut s = Scanner::new("  5 4\t2 /\nsin ".chars());
        let mut words = Vec::new();
        loop {
            s.skip_whitespace();
            match s.scan_word() {
                Some(w) => words.push(w),
                None => break,
            }
        }
        assert_eq!(words, vec!["5", "4", "2", "/", "sin"]);
    }

    #[test]
    fn test_scan_number() {
        for (src, expect) in &[
            ("12", "12"),
            ("-3.25", "-3.25"),
            ("+.5", "+.5"),
            ("7.", "7."),
            ("1e10", "1e10"),
            ("2.5E-3", "2.5E-3"),
        ] {
            let mut s = Scanner::new(src.chars());
            assert_eq!(s.scan_number().as_deref(), Some(*expect));
            assert_eq!(s.peek(), None);
        }
    }

    #[test]
    fn test_scan_number_partial() {
        // dangling exponent is left for the caller to reject
        let mut s = Scanner::new("3e+".chars());
        assert_eq!(s.scan_number(), Some("3".to_string()));
        assert_eq!(s.peek(), Some('e'));

        let mut s = Scanner::new("1.2.3".chars());
        assert_eq!(s.scan_number(), Some("1.2".to_string()));
        assert_eq!(s.peek(), Some('.'));
    }

    #[test]
    fn test_scan_number_rejects() {
        for src in &["-", ".", "+.", "sin", "e5"] {
            let mut s = Scanner::new(src.chars());
            assert_eq!(s.scan_number(), None, "{}", src);
            // nothing consumed after a failed match
            assert_eq!(s.buffer_pos(), -1);
        }
    }
}
