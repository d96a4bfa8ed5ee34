/// Splits `text` into word-aligned chunks of at most `budget` characters.
///
/// Words are separated by single spaces and every word is followed by one
/// space in its chunk. A word of at least `budget` characters gets a chunk of
/// its own, one character over the budget counting its trailing space.
pub fn split_text(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if text.is_empty() {
        return chunks;
    }

    let mut chunk = String::new();
    let mut chunk_len = 0;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        if chunk_len > 0 && chunk_len + word_len >= budget {
            chunks.push(std::mem::take(&mut chunk));
            chunk_len = 0;
        }
        chunk.push_str(word);
        chunk.push(' ');
        chunk_len += word_len + 1;
    }
    chunks.push(chunk);
    chunks
}
