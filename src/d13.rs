use {
    crate::*,
    serde_json::{Error as JsonError, Value},
    std::{cmp::Ordering, str::Split, sync::OnceLock},
};

/// A packet is a JSON document restricted to lists and non-negative integers.
#[derive(Clone, Debug, PartialEq)]
struct Packet(Value);

#[derive(Debug)]
pub enum PacketParseError {
    FailedToParseJson(JsonError),
    NotAPacket,
}

impl Packet {
    fn divider_2() -> &'static Self {
        static ONCE_LOCK: OnceLock<Packet> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Self::divider(2_u32))
    }

    fn divider_6() -> &'static Self {
        static ONCE_LOCK: OnceLock<Packet> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Self::divider(6_u32))
    }

    fn divider(int: u32) -> Self {
        Self(Value::Array(vec![Value::Array(vec![int.into()])]))
    }

    fn is_valid_value(value: &Value) -> bool {
        match value {
            Value::Number(number) => number.is_u64(),
            Value::Array(values) => values.iter().all(Self::is_valid_value),
            _ => false,
        }
    }

    fn value_cmp(left: &Value, right: &Value) -> Ordering {
        match (left, right) {
            (Value::Number(left_number), Value::Number(right_number)) => {
                left_number.as_u64().cmp(&right_number.as_u64())
            }
            (Value::Array(left_values), Value::Array(right_values)) => {
                Self::slice_cmp(left_values, right_values)
            }
            // An integer compared against a list is promoted to a singleton list.
            (Value::Number(_), Value::Array(right_values)) => {
                Self::slice_cmp(&[left.clone()], right_values)
            }
            (Value::Array(left_values), Value::Number(_)) => {
                Self::slice_cmp(left_values, &[right.clone()])
            }
            _ => unreachable!("Packet values only contain numbers and arrays"),
        }
    }

    fn slice_cmp(left_slice: &[Value], right_slice: &[Value]) -> Ordering {
        left_slice
            .iter()
            .zip(right_slice.iter())
            .map(|(left, right)| Self::value_cmp(left, right))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left_slice.len().cmp(&right_slice.len()))
    }

    fn cmp(&self, other: &Self) -> Ordering {
        Self::value_cmp(&self.0, &other.0)
    }
}

impl TryFrom<&str> for Packet {
    type Error = PacketParseError;

    fn try_from(packet_str: &str) -> Result<Self, Self::Error> {
        use PacketParseError::*;

        let value: Value = serde_json::from_str(packet_str).map_err(FailedToParseJson)?;

        if Self::is_valid_value(&value) {
            Ok(Self(value))
        } else {
            Err(NotAPacket)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PacketPair {
    left: Packet,
    right: Packet,
}

impl PacketPair {
    fn cmp(&self) -> Ordering {
        self.left.cmp(&self.right)
    }
}

#[derive(Debug)]
pub enum PacketPairParseError<'s> {
    NoLeftToken,
    FailedToParseLeft(PacketParseError),
    NoRightToken,
    FailedToParseRight(PacketParseError),
    ExtraTokenFound(&'s str),
}

impl<'s> TryFrom<&'s str> for PacketPair {
    type Error = PacketPairParseError<'s>;

    fn try_from(packet_pair_str: &'s str) -> Result<Self, Self::Error> {
        use PacketPairParseError::*;

        let mut packet_iter: Split<char> = packet_pair_str.split('\n');

        let left: Packet = match packet_iter.next() {
            None => Err(NoLeftToken),
            Some(left_str) => left_str.try_into().map_err(FailedToParseLeft),
        }?;
        let right: Packet = match packet_iter.next() {
            None => Err(NoRightToken),
            Some(right_str) => right_str.try_into().map_err(FailedToParseRight),
        }?;

        match packet_iter.next() {
            Some(extra_token) => Err(ExtraTokenFound(extra_token)),
            None => Ok(Self { left, right }),
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<PacketPair>);

impl Solution {
    fn right_order_pair_index_sum(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, packet_pair)| packet_pair.cmp() == Ordering::Less)
            .map(|(index, _)| index + 1_usize)
            .sum()
    }

    fn decoder_key(&self) -> usize {
        let mut packets: Vec<&Packet> = self
            .0
            .iter()
            .flat_map(|packet_pair| [&packet_pair.left, &packet_pair.right])
            .collect();

        packets.push(Packet::divider_2());
        packets.push(Packet::divider_6());
        packets.sort_unstable_by(|&left, &right| left.cmp(right));

        (packets
            .iter()
            .position(|packet| **packet == *Packet::divider_2())
            .unwrap()
            + 1_usize)
            * (packets
                .iter()
                .position(|packet| **packet == *Packet::divider_6())
                .unwrap()
                + 1_usize)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.right_order_pair_index_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.decoder_key());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = PacketPairParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        let mut packet_pairs: Vec<PacketPair> = Vec::new();

        for packet_pair_str in input.split("\n\n") {
            packet_pairs.push(packet_pair_str.try_into()?);
        }

        Ok(Self(packet_pairs))
    }
}
