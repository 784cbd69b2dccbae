use std::collections::HashMap;

use candle_core::Device;
use tokenizers::models::wordlevel::WordLevel;
use tokenizers::pre_tokenizers::whitespace::WhitespaceSplit;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::processors::PostProcessorWrapper;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer};

use sitechat_embed::tokenize::{configure_tokenizer, tokenize_batch};

const PAD: u32 = 9;
const CLS: u32 = 2;
const SEP: u32 = 3;

/// Word-level tokenizer with BERT-style `[CLS] ... [SEP]` wrapping.
fn word_tokenizer() -> Tokenizer {
    let tokens = [
        ("[UNK]", 1),
        ("[CLS]", CLS),
        ("[SEP]", SEP),
        ("a", 4),
        ("b", 5),
        ("c", 6),
        ("d", 7),
        ("e", 8),
        ("[PAD]", PAD),
    ];
    let vocab: HashMap<String, u32> = tokens
        .into_iter()
        .map(|(t, id)| (t.to_string(), id))
        .collect();
    let model = WordLevel::builder().vocab(vocab).unk_token("[UNK]".to_string()).build().expect("wordlevel");
    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_pre_tokenizer(PreTokenizerWrapper::from(WhitespaceSplit));
    tokenizer.with_post_processor(PostProcessorWrapper::from(BertProcessing::new(
        ("[SEP]".to_string(), SEP),
        ("[CLS]".to_string(), CLS),
    )));
    tokenizer
}

#[test]
fn truncation_keeps_closing_separator() {
    let mut tokenizer = word_tokenizer();
    let pad_id = configure_tokenizer(&mut tokenizer, 4).expect("configure");
    assert_eq!(pad_id, PAD);

    let batch = tokenize_batch(&tokenizer, &["a b c d e".to_string()], pad_id, &Device::Cpu).expect("tokenize");
    let ids = batch.input_ids.to_vec2::<u32>().expect("ids");
    assert_eq!(ids, vec![vec![CLS, 4, 5, SEP]]);
}

#[test]
fn padding_from_tokenizer_file_is_replaced_by_batch_padding() {
    let mut tokenizer = word_tokenizer();
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(10),
        pad_id: PAD,
        pad_token: "[PAD]".to_string(),
        ..Default::default()
    }));
    let pad_id = configure_tokenizer(&mut tokenizer, 8).expect("configure");

    let texts = vec!["a".to_string(), "a b c".to_string()];
    let batch = tokenize_batch(&tokenizer, &texts, pad_id, &Device::Cpu).expect("tokenize");
    assert_eq!(
        batch.input_ids.to_vec2::<u32>().expect("ids"),
        vec![vec![CLS, 4, SEP, PAD, PAD], vec![CLS, 4, 5, 6, SEP]]
    );
    assert_eq!(
        batch.attention_mask.to_vec2::<u32>().expect("mask"),
        vec![vec![1, 1, 1, 0, 0], vec![1, 1, 1, 1, 1]]
    );
}
